//! Pixel grids flowing through the quantizer.
//!
//! [`WorkingGrid`] holds the normalized image widened to signed channels and
//! is consumed by [`quantize()`](super::quantize). [`QuantizedGrid`] holds one
//! device code per pixel and is what the packer reads.

use image::RgbImage;

use crate::api::EncodeError;
use crate::color::Rgb;
use crate::palette::Palette;

/// Lower bound for accumulated channel values during diffusion.
pub const ACCUMULATION_MIN: i16 = -512;

/// Upper bound for accumulated channel values during diffusion.
pub const ACCUMULATION_MAX: i16 = 767;

/// Signed working copy of the normalized image, `height x width` cells.
///
/// Channel values start in 0..=255 and drift as residuals are diffused into
/// them. They are bounded to `ACCUMULATION_MIN..=ACCUMULATION_MAX`, which is
/// wide enough never to change a nearest-color decision in practice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingGrid {
    cells: Vec<[i16; 3]>,
    width: usize,
    height: usize,
}

impl WorkingGrid {
    /// Widen an RGB image into a working grid.
    pub fn from_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let cells = image.pixels().map(|&px| Rgb::from(px).widen()).collect();
        Self {
            cells,
            width: width as usize,
            height: height as usize,
        }
    }

    /// Build a grid from raw pixels in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::MalformedInput`] unless
    /// `pixels.len() == width * height`.
    pub fn from_pixels(pixels: &[Rgb], width: usize, height: usize) -> Result<Self, EncodeError> {
        check_len(pixels.len(), width, height)?;
        Ok(Self {
            cells: pixels.iter().map(|p| p.widen()).collect(),
            width,
            height,
        })
    }

    /// Grid width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current (possibly error-adjusted) value at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [i16; 3] {
        self.cells[y * self.width + x]
    }

    /// Add a signed amount to one cell, bounding the result.
    #[inline]
    pub(crate) fn add(&mut self, x: usize, y: usize, amount: [i32; 3]) {
        let cell = &mut self.cells[y * self.width + x];
        for c in 0..3 {
            let value = i32::from(cell[c]) + amount[c];
            cell[c] = value.clamp(i32::from(ACCUMULATION_MIN), i32::from(ACCUMULATION_MAX)) as i16;
        }
    }
}

fn check_len(len: usize, width: usize, height: usize) -> Result<(), EncodeError> {
    match width.checked_mul(height) {
        Some(expected) if expected == len => Ok(()),
        _ => Err(EncodeError::MalformedInput(format!(
            "{len} cells for a {width}x{height} grid"
        ))),
    }
}

/// One device code per pixel, row-major.
///
/// Produced by the quantizer and never mutated afterwards; the only
/// transformation offered ([`rotate_ccw()`](QuantizedGrid::rotate_ccw))
/// returns a new grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedGrid {
    codes: Vec<u8>,
    width: usize,
    height: usize,
}

impl QuantizedGrid {
    /// Wrap device codes with their dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::MalformedInput`] unless
    /// `codes.len() == width * height`.
    pub fn new(codes: Vec<u8>, width: usize, height: usize) -> Result<Self, EncodeError> {
        check_len(codes.len(), width, height)?;
        Ok(Self::from_parts(codes, width, height))
    }

    /// Construct from parts the caller has already sized consistently.
    pub(crate) fn from_parts(codes: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(codes.len(), width * height);
        Self {
            codes,
            width,
            height,
        }
    }

    /// Device codes in raster order.
    #[inline]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Grid width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the grid has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Device code at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.codes[y * self.width + x]
    }

    /// Rotate 90 degrees counter-clockwise.
    ///
    /// Pixel `(x, y)` of a `W x H` grid lands at `(y, W - 1 - x)` of the
    /// resulting `H x W` grid. Used to turn a portrait frame into the
    /// panel's native landscape scan order.
    ///
    /// # Example
    ///
    /// ```
    /// use epd_dither::QuantizedGrid;
    ///
    /// // 2x1 -> 1x2: right pixel ends up on top
    /// let grid = QuantizedGrid::new(vec![0, 1], 2, 1).unwrap();
    /// let rotated = grid.rotate_ccw();
    /// assert_eq!((rotated.width(), rotated.height()), (1, 2));
    /// assert_eq!(rotated.codes(), &[1, 0]);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        let (w, h) = (self.width, self.height);
        let mut codes = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                codes[(w - 1 - x) * h + y] = self.codes[y * w + x];
            }
        }
        Self::from_parts(codes, h, w)
    }

    /// Render the codes back to their palette colors.
    ///
    /// Codes missing from `palette` render black.
    pub fn to_rgb(&self, palette: &Palette) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let code = self.get(x as usize, y as usize);
            palette
                .get(code)
                .map_or(Rgb::default(), |entry| entry.color)
                .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_grid_from_image() {
        let image = RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 7]));
        let grid = WorkingGrid::from_image(&image);
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.get(2, 1), [2, 1, 7]);
    }

    #[test]
    fn test_working_grid_add_is_signed_and_bounded() {
        let mut grid = WorkingGrid::from_pixels(&[Rgb::new(10, 250, 0)], 1, 1).unwrap();
        grid.add(0, 0, [-20, 20, 0]);
        assert_eq!(grid.get(0, 0), [-10, 270, 0]);

        grid.add(0, 0, [-5000, 5000, 0]);
        assert_eq!(grid.get(0, 0), [ACCUMULATION_MIN, ACCUMULATION_MAX, 0]);
    }

    #[test]
    fn test_rotate_ccw_3x2() {
        // 0 1 2
        // 3 4 5
        let grid = QuantizedGrid::new(vec![0, 1, 2, 3, 4, 5], 3, 2).unwrap();
        let rotated = grid.rotate_ccw();
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        // 2 5
        // 1 4
        // 0 3
        assert_eq!(rotated.codes(), &[2, 5, 1, 4, 0, 3]);
    }

    #[test]
    fn test_rotate_ccw_four_times_is_identity() {
        let grid = QuantizedGrid::new((0..12).collect(), 4, 3).unwrap();
        let back = grid.rotate_ccw().rotate_ccw().rotate_ccw().rotate_ccw();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_to_rgb_uses_palette_colors() {
        let palette = Palette::spectra6();
        let grid = QuantizedGrid::new(vec![3, 5, 9], 3, 1).unwrap();
        let image = grid.to_rgb(&palette);
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 255]);
        assert_eq!(image.get_pixel(2, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_constructors_reject_inconsistent_lengths() {
        let short = QuantizedGrid::new(vec![0, 1, 2], 2, 2);
        assert!(matches!(short, Err(EncodeError::MalformedInput(_))));
        let long = QuantizedGrid::new(vec![0; 5], 2, 2);
        assert!(matches!(long, Err(EncodeError::MalformedInput(_))));
        let overflowing = QuantizedGrid::new(Vec::new(), usize::MAX, 2);
        assert!(matches!(overflowing, Err(EncodeError::MalformedInput(_))));

        let pixels = WorkingGrid::from_pixels(&[Rgb::default(); 3], 2, 2);
        assert!(matches!(pixels, Err(EncodeError::MalformedInput(_))));
    }
}
