use epd_dither::{EncodedFrame, Orientation};

use crate::error::SenderError;

/// Physical panel geometry in its native scan orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySpec {
    pub width: u32,
    pub height: u32,
}

impl DisplaySpec {
    /// 7.3" Spectra 6 panel: 800x480
    pub const SPECTRA6_7IN3: Self = Self {
        width: 800,
        height: 480,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of one packed 4-bit frame: two pixels per byte, rounded up
    pub fn frame_bytes(&self) -> usize {
        self.pixel_count().div_ceil(2)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.width, self.height)
    }

    /// Check that a frame matches this panel before it goes on the wire
    pub fn validate_frame(&self, frame: &EncodedFrame) -> Result<(), SenderError> {
        if frame.len() != self.frame_bytes() || frame.pixel_count() != self.pixel_count() {
            Err(SenderError::FrameSize {
                expected: self.frame_bytes(),
                actual: frame.len(),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for DisplaySpec {
    fn default() -> Self {
        Self::SPECTRA6_7IN3
    }
}
