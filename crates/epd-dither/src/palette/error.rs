//! Error types for palette operations
//!
//! This module provides error types for color parsing and palette validation.

use std::num::ParseIntError;

use thiserror::Error;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error type for palette validation.
///
/// Returned when a palette configuration cannot drive the device: no
/// entries, two entries sharing a device code, or a code that does not fit
/// the packed output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// No entries provided
    #[error("palette cannot be empty")]
    Empty,
    /// Two entries share the same device code
    #[error("duplicate device code {code:#x}")]
    DuplicateCode {
        /// The repeated code
        code: u8,
    },
    /// A device code is wider than the packed nibble
    #[error("device code {code:#x} does not fit in 4 bits (max {max:#x})")]
    CodeTooWide {
        /// The offending code
        code: u8,
        /// Largest code the packer accepts
        max: u8,
    },
    /// Invalid hex color string
    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),
}
