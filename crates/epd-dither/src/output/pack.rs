//! Nibble packing of device codes into the panel wire format.
//!
//! Two codes per byte in raster order: the first pixel of each pair goes in
//! the high nibble, the second in the low nibble. The buffer is exactly
//! `ceil(width * height / 2)` bytes with no header. When the pixel count is
//! odd the final low nibble is zero.

use crate::api::EncodeError;
use crate::dither::QuantizedGrid;
use crate::palette::{Palette, PaletteError};

/// Largest device code that fits in one nibble.
pub const NIBBLE_MAX: u8 = 0x0F;

/// Packed frame ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    bytes: Vec<u8>,
    pixel_count: usize,
}

impl EncodedFrame {
    /// Packed bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the frame and return its packed bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of pixels encoded in the frame.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Length of the packed buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the frame holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Recover the device codes, exactly `pixel_count` of them.
    pub fn unpack(&self) -> Vec<u8> {
        self.bytes
            .iter()
            .flat_map(|&byte| [byte >> 4, byte & NIBBLE_MAX])
            .take(self.pixel_count)
            .collect()
    }
}

/// Check that every device code of `palette` fits in a nibble.
///
/// # Errors
///
/// Returns [`EncodeError::PaletteConfig`] wrapping
/// [`PaletteError::CodeTooWide`] for the first offending code.
pub fn validate_palette(palette: &Palette) -> Result<(), EncodeError> {
    match palette.entries().iter().find(|e| e.code > NIBBLE_MAX) {
        Some(entry) => Err(PaletteError::CodeTooWide {
            code: entry.code,
            max: NIBBLE_MAX,
        }
        .into()),
        None => Ok(()),
    }
}

/// Pack a quantized grid two pixels per byte, high nibble first.
///
/// # Errors
///
/// Returns [`EncodeError::EncodingOverflow`] if any code exceeds
/// [`NIBBLE_MAX`]. No partial buffer is returned.
///
/// # Example
///
/// ```
/// use epd_dither::{pack, QuantizedGrid};
///
/// let grid = QuantizedGrid::new(vec![0x1, 0x2, 0x3], 3, 1).unwrap();
/// let frame = pack(&grid).unwrap();
/// assert_eq!(frame.as_bytes(), &[0x12, 0x30]);
/// ```
pub fn pack(grid: &QuantizedGrid) -> Result<EncodedFrame, EncodeError> {
    let codes = grid.codes();
    if let Some((index, &code)) = codes.iter().enumerate().find(|(_, &c)| c > NIBBLE_MAX) {
        return Err(EncodeError::EncodingOverflow { code, index });
    }

    let bytes: Vec<u8> = codes
        .chunks(2)
        .map(|pair| match *pair {
            [high, low] => (high << 4) | low,
            [high] => high << 4,
            _ => 0,
        })
        .collect();

    tracing::debug!(
        pixels = codes.len(),
        bytes = bytes.len(),
        "packed frame"
    );
    Ok(EncodedFrame {
        bytes,
        pixel_count: codes.len(),
    })
}
