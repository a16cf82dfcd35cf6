//! PNG debug artifacts.
//!
//! Neither artifact is sent to the panel. The RGB artifact shows the image
//! right after geometry normalization; the indexed artifact shows what the
//! panel will display, one PLTE entry per palette color.

use std::io::Cursor;

use image::RgbImage;

use crate::api::EncodeError;
use crate::dither::QuantizedGrid;
use crate::palette::Palette;

/// Encode the normalized, pre-quantization image as a lossless RGB PNG.
pub fn encode_png_rgb(image: &RgbImage) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    encode_png(
        width,
        height,
        png::ColorType::Rgb,
        png::BitDepth::Eight,
        None,
        image.as_raw(),
    )
}

/// Encode a quantized grid as an indexed PNG using the palette's colors.
///
/// PNG indices follow the palette's code order, so the device code is not
/// required to be a valid PNG index. Bit depth shrinks with the palette
/// size: 1 bit for up to 2 colors, 2 for up to 4, 4 for up to 16, else 8.
///
/// # Errors
///
/// Returns [`EncodeError::MalformedInput`] for a grid with a zero dimension.
pub fn encode_png_indexed(grid: &QuantizedGrid, palette: &Palette) -> Result<Vec<u8>, EncodeError> {
    if grid.width() == 0 || grid.height() == 0 {
        return Err(EncodeError::MalformedInput(format!(
            "cannot render a {}x{} grid",
            grid.width(),
            grid.height()
        )));
    }

    let plte: Vec<u8> = palette
        .entries()
        .iter()
        .flat_map(|e| e.color.to_bytes())
        .collect();

    let mut index_of = [0u8; 256];
    for (i, entry) in palette.entries().iter().enumerate() {
        index_of[usize::from(entry.code)] = i as u8;
    }
    let indices: Vec<u8> = grid
        .codes()
        .iter()
        .map(|&code| index_of[usize::from(code)])
        .collect();

    let (depth, bits) = match palette.len() {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };
    let width = grid.width() as u32;
    let packed = if bits == 8 {
        indices
    } else {
        pack_nbits(&indices, width, bits)
    };

    encode_png(
        width,
        grid.height() as u32,
        png::ColorType::Indexed,
        depth,
        Some(&plte),
        &packed,
    )
}

fn encode_png(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| EncodeError::Png(e.to_string()))?;
        writer
            .write_image_data(data)
            .map_err(|e| EncodeError::Png(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack indices into N-bit PNG rows (1, 2 or 4 bits per pixel).
///
/// Each row starts on a byte boundary, unlike the panel wire format.
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / (width as usize).max(1);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>, Option<Vec<u8>>) {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().unwrap();
        let plte = reader.info().palette.as_ref().map(|p| p.to_vec());
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf, plte)
    }

    #[test]
    fn test_pack_nbits_rows_are_byte_aligned() {
        // 3 pixels per row at 2 bits: one byte per row
        let packed = pack_nbits(&[1, 2, 3, 3, 2, 1], 3, 2);
        assert_eq!(packed, vec![0b01_10_11_00, 0b11_10_01_00]);
    }

    #[test]
    fn test_rgb_png_round_trips_pixels() {
        let image = RgbImage::from_fn(5, 3, |x, y| image::Rgb([x as u8 * 40, y as u8 * 80, 7]));
        let bytes = encode_png_rgb(&image).unwrap();
        let (info, data, _) = decode(&bytes);
        assert_eq!((info.width, info.height), (5, 3));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        assert_eq!(data, image.into_raw());
    }

    #[test]
    fn test_indexed_png_spectra6() {
        let palette = Palette::spectra6();
        // codes 0,1,2,3,5,6 map to PLTE indices 0..6
        let grid = QuantizedGrid::new(vec![6, 5, 3, 2, 1, 0], 3, 2).unwrap();
        let bytes = encode_png_indexed(&grid, &palette).unwrap();
        let (info, data, plte) = decode(&bytes);

        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Indexed);
        assert_eq!(info.bit_depth, png::BitDepth::Four);
        assert_eq!(&plte.unwrap()[..6], &[0, 0, 0, 255, 255, 255]);
        // 4-bit rows: [5,4,3] -> 0x54 0x30, [2,1,0] -> 0x21 0x00
        assert_eq!(data, vec![0x54, 0x30, 0x21, 0x00]);
    }

    #[test]
    fn test_indexed_png_black_white_is_one_bit() {
        let grid = QuantizedGrid::new(vec![0, 1, 0, 1, 1, 0, 1, 0], 4, 2).unwrap();
        let bytes = encode_png_indexed(&grid, &Palette::black_white()).unwrap();
        let (info, data, _) = decode(&bytes);
        assert_eq!(info.bit_depth, png::BitDepth::One);
        assert_eq!(data, vec![0b0101_0000, 0b1010_0000]);
    }

    #[test]
    fn test_indexed_png_rejects_empty_grid() {
        let palette = Palette::black_white();
        for (width, height) in [(0, 3), (3, 0), (0, 0)] {
            let grid = QuantizedGrid::new(Vec::new(), width, height).unwrap();
            let result = encode_png_indexed(&grid, &palette);
            assert!(
                matches!(result, Err(EncodeError::MalformedInput(_))),
                "{width}x{height}"
            );
        }
    }
}
