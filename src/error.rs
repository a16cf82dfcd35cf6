use std::path::PathBuf;

use epd_dither::{EncodeError, PaletteError};
use thiserror::Error;

/// Problems loading or interpreting a device profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read profile {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid profile YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid {field} value: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("Palette entry '{name}': {source}")]
    PaletteEntry {
        name: String,
        source: PaletteError,
    },

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),
}

/// Everything that can go wrong between reading a source image and handing
/// a frame to the transport.
#[derive(Debug, Error)]
pub enum SenderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Frame is {actual} bytes, panel expects {expected}")]
    FrameSize { expected: usize, actual: usize },

    #[error("No endpoint configured (set `endpoint` in the profile or pass --endpoint)")]
    MissingEndpoint,

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
