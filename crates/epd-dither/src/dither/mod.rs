//! Error diffusion quantization.
//!
//! The quantizer walks the working grid in raster order (rows top to
//! bottom, pixels left to right). At each pixel it:
//!
//! 1. Resolves the current, error-adjusted value to the nearest palette
//!    entry and records that entry's device code.
//! 2. Computes the per-channel residual `value - palette_color`.
//! 3. Adds `residual * weight / divisor` to every in-bounds kernel target.
//!
//! All arithmetic is integer, computed in 32 bits and truncated toward zero
//! before being bounded into the grid. Identical inputs always produce
//! identical codes.
//!
//! [`FLOYD_STEINBERG`] is the default kernel; [`ATKINSON`] is available for
//! panels where its reduced bleeding looks better.

mod grid;
mod kernel;

use std::fmt;
use std::str::FromStr;

pub use grid::{QuantizedGrid, WorkingGrid, ACCUMULATION_MAX, ACCUMULATION_MIN};
pub use kernel::{Kernel, ATKINSON, FLOYD_STEINBERG};

use crate::palette::Resolver;

/// Error diffusion algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    /// Floyd-Steinberg: 4 neighbours, full propagation.
    #[default]
    FloydSteinberg,
    /// Atkinson: 6 neighbours, 75% propagation.
    Atkinson,
}

impl DitherAlgorithm {
    /// The diffusion kernel for this algorithm.
    pub fn kernel(self) -> &'static Kernel {
        match self {
            DitherAlgorithm::FloydSteinberg => &FLOYD_STEINBERG,
            DitherAlgorithm::Atkinson => &ATKINSON,
        }
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherAlgorithm::FloydSteinberg => f.write_str("floyd-steinberg"),
            DitherAlgorithm::Atkinson => f.write_str("atkinson"),
        }
    }
}

impl FromStr for DitherAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floyd-steinberg" | "floyd_steinberg" | "fs" => Ok(DitherAlgorithm::FloydSteinberg),
            "atkinson" => Ok(DitherAlgorithm::Atkinson),
            other => Err(format!(
                "unknown dither algorithm '{other}' (expected floyd-steinberg or atkinson)"
            )),
        }
    }
}

/// Quantize a working grid to device codes.
///
/// Consumes `grid`: its values are modified in place as error is diffused
/// and are meaningless afterwards. Every returned code is the code of some
/// entry the resolver can return.
///
/// # Example
///
/// ```
/// use epd_dither::{quantize, Palette, Rgb, WorkingGrid, FLOYD_STEINBERG};
///
/// let palette = Palette::black_white();
/// let grid = WorkingGrid::from_pixels(&[Rgb::new(127, 127, 127); 4], 4, 1).unwrap();
/// let codes = quantize(grid, &palette, &FLOYD_STEINBERG);
/// assert_eq!(codes.codes(), &[0, 1, 0, 1]);
/// ```
pub fn quantize<R: Resolver + ?Sized>(
    mut grid: WorkingGrid,
    resolver: &R,
    kernel: &Kernel,
) -> QuantizedGrid {
    let (width, height) = (grid.width(), grid.height());
    let mut codes = Vec::with_capacity(width * height);
    let divisor = i32::from(kernel.divisor);

    for y in 0..height {
        for x in 0..width {
            let value = grid.get(x, y);
            let entry = resolver.resolve(value);
            codes.push(entry.code);

            let target = entry.color.widen();
            let residual = [
                i32::from(value[0]) - i32::from(target[0]),
                i32::from(value[1]) - i32::from(target[1]),
                i32::from(value[2]) - i32::from(target[2]),
            ];
            if residual == [0, 0, 0] {
                continue;
            }

            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i64 + i64::from(dx);
                let ny = y as i64 + i64::from(dy);
                if nx < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let w = i32::from(weight);
                grid.add(
                    nx as usize,
                    ny as usize,
                    [
                        residual[0] * w / divisor,
                        residual[1] * w / divisor,
                        residual[2] * w / divisor,
                    ],
                );
            }
        }
    }

    tracing::trace!(width, height, "quantized grid");
    QuantizedGrid::from_parts(codes, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::palette::{KdTreeResolver, Palette};

    fn uniform(color: Rgb, width: usize, height: usize) -> WorkingGrid {
        WorkingGrid::from_pixels(&vec![color; width * height], width, height).unwrap()
    }

    #[test]
    fn test_algorithm_parse_and_display() {
        assert_eq!("floyd-steinberg".parse(), Ok(DitherAlgorithm::FloydSteinberg));
        assert_eq!("Atkinson".parse(), Ok(DitherAlgorithm::Atkinson));
        assert!("ordered".parse::<DitherAlgorithm>().is_err());
        assert_eq!(DitherAlgorithm::Atkinson.to_string(), "atkinson");
        assert_eq!(DitherAlgorithm::default().kernel(), &FLOYD_STEINBERG);
    }

    #[test]
    fn test_single_pixel() {
        let palette = Palette::black_white();
        let codes = quantize(uniform(Rgb::new(200, 200, 200), 1, 1), &palette, &FLOYD_STEINBERG);
        assert_eq!(codes.codes(), &[1]);
    }

    #[test]
    fn test_mid_gray_checkerboard() {
        // Hand-traced with truncating integer diffusion:
        //   row 0: 127 -> black, right neighbour gets 127*7/16 = 55 -> 182 -> white ...
        let palette = Palette::black_white();
        let codes = quantize(uniform(Rgb::new(127, 127, 127), 4, 2), &palette, &FLOYD_STEINBERG);
        assert_eq!(codes.codes(), &[0, 1, 0, 1, 1, 0, 1, 0]);
    }

    #[test]
    fn test_exact_palette_colors_are_kept() {
        let palette = Palette::spectra6();
        let pixels: Vec<Rgb> = palette.entries().iter().map(|e| e.color).collect();
        let expected: Vec<u8> = palette.entries().iter().map(|e| e.code).collect();
        let grid = WorkingGrid::from_pixels(&pixels, pixels.len(), 1).unwrap();
        let codes = quantize(grid, &palette, &FLOYD_STEINBERG);
        assert_eq!(codes.codes(), expected.as_slice());
    }

    #[test]
    fn test_uniform_black_and_white() {
        let palette = Palette::black_white();
        for kernel in [&FLOYD_STEINBERG, &ATKINSON] {
            let black = quantize(uniform(Rgb::new(0, 0, 0), 7, 5), &palette, kernel);
            assert!(black.codes().iter().all(|&c| c == 0));
            let white = quantize(uniform(Rgb::new(255, 255, 255), 7, 5), &palette, kernel);
            assert!(white.codes().iter().all(|&c| c == 1));
        }
    }

    #[test]
    fn test_codes_stay_within_palette() {
        let palette = Palette::spectra6();
        let pixels: Vec<Rgb> = (0..24 * 16)
            .map(|i| Rgb::new((i * 7) as u8, (i * 13) as u8, (i * 29) as u8))
            .collect();
        for kernel in [&FLOYD_STEINBERG, &ATKINSON] {
            let codes = quantize(WorkingGrid::from_pixels(&pixels, 24, 16).unwrap(), &palette, kernel);
            assert_eq!(codes.len(), 24 * 16);
            assert!(codes.codes().iter().all(|&c| palette.contains_code(c)));
        }
    }

    #[test]
    fn test_deterministic() {
        let palette = Palette::spectra6();
        let pixels: Vec<Rgb> = (0..32 * 20)
            .map(|i| Rgb::new((i * 3) as u8, (i * 5) as u8, (i * 11) as u8))
            .collect();
        let a = quantize(WorkingGrid::from_pixels(&pixels, 32, 20).unwrap(), &palette, &FLOYD_STEINBERG);
        let b = quantize(WorkingGrid::from_pixels(&pixels, 32, 20).unwrap(), &palette, &FLOYD_STEINBERG);
        assert_eq!(a, b);
    }

    #[test]
    fn test_kdtree_resolver_gives_same_result() {
        let palette = Palette::spectra6();
        let tree = KdTreeResolver::new(&palette);
        let pixels: Vec<Rgb> = (0..40 * 12)
            .map(|i| Rgb::new((i * 17) as u8, (i * 7) as u8, (i * 3) as u8))
            .collect();
        let linear = quantize(WorkingGrid::from_pixels(&pixels, 40, 12).unwrap(), &palette, &ATKINSON);
        let fast = quantize(WorkingGrid::from_pixels(&pixels, 40, 12).unwrap(), &tree, &ATKINSON);
        assert_eq!(linear, fast);
    }

    #[test]
    fn test_gray_mixes_both_colors() {
        let palette = Palette::black_white();
        let codes = quantize(uniform(Rgb::new(128, 128, 128), 16, 16), &palette, &FLOYD_STEINBERG);
        let white = codes.codes().iter().filter(|&&c| c == 1).count();
        assert!((96..=160).contains(&white), "white count {white}");
    }
}
