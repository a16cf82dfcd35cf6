//! Assertion helpers for tests.

use epd_dither::EncodedFrame;
use pretty_assertions::assert_eq;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Assert a frame has the packed size of a `width x height` panel
pub fn assert_frame_size(frame: &EncodedFrame, width: u32, height: u32) {
    let pixels = width as usize * height as usize;
    assert_eq!(frame.pixel_count(), pixels, "pixel count");
    assert_eq!(frame.len(), pixels.div_ceil(2), "packed length");
}

/// Assert every device code in the frame belongs to `codes`
pub fn assert_codes_within(frame: &EncodedFrame, codes: &[u8]) {
    for (i, code) in frame.unpack().into_iter().enumerate() {
        assert!(
            codes.contains(&code),
            "pixel {i} has code {code:#x}, expected one of {codes:?}"
        );
    }
}

/// Assert a file holds a PNG image
pub fn assert_png_file(path: &std::path::Path) {
    let bytes = std::fs::read(path).expect("Failed to read PNG");
    assert!(
        bytes.len() > 8 && bytes[..8] == PNG_SIGNATURE,
        "Expected PNG at {}, got {} bytes starting with {:?}",
        path.display(),
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}
