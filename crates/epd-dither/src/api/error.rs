//! Unified error type for the epd-dither public API.
//!
//! [`EncodeError`] covers every way an encode call can fail. All failures
//! happen before any output is handed back: either a complete frame is
//! produced or nothing is.

use thiserror::Error;

use crate::palette::PaletteError;

/// Unified error type for the encoding pipeline.
///
/// # Example
///
/// ```
/// use epd_dither::{EncodeError, Palette};
///
/// fn palette() -> Result<Palette, EncodeError> {
///     Ok(Palette::from_hex(&[("#000000", 0), ("#FFFFFF", 1)])?)
/// }
/// assert!(palette().is_ok());
/// ```
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Zero-area source or target, or a source that is not RGB.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The geometry normalizer returned the wrong size. Indicates a bug.
    #[error("normalized image is {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        /// Requested target size
        expected: (u32, u32),
        /// Size actually produced
        actual: (u32, u32),
    },

    /// Palette cannot drive the packer (empty, duplicate or too-wide codes).
    #[error("palette configuration error: {0}")]
    PaletteConfig(#[from] PaletteError),

    /// A code wider than a nibble reached the packer. Indicates a bug.
    #[error("device code {code:#x} at pixel {index} overflows the 4-bit packing")]
    EncodingOverflow {
        /// Offending code
        code: u8,
        /// Raster index of the pixel
        index: usize,
    },

    /// Debug artifact could not be encoded.
    #[error("PNG encode error: {0}")]
    Png(String),
}
