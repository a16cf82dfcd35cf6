//! Error diffusion kernel definitions.
//!
//! Each kernel specifies how the quantization residual of one pixel is
//! split among neighbours that have not been visited yet in raster order.

/// An error diffusion kernel.
///
/// Entries are `(dx, dy, weight)`; each neighbour receives
/// `residual * weight / divisor`. `dy` is never negative and entries with
/// `dy == 0` always have `dx > 0`, so every target lies after the current
/// pixel in raster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
};

/// Atkinson dithering kernel.
///
/// Distributes error to 6 neighbors with 75% total propagation (6/8).
/// The dropped quarter keeps small palettes from bleeding, at the cost of
/// clipped highlights and shadows.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),  // right
        (2, 0, 1),  // two right
        (-1, 1, 1), // bottom-left
        (0, 1, 1),  // bottom
        (1, 1, 1),  // bottom-right
        (0, 2, 1),  // two below
    ],
    divisor: 8,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum(kernel: &Kernel) -> u32 {
        kernel.entries.iter().map(|&(_, _, w)| u32::from(w)).sum()
    }

    #[test]
    fn test_floyd_steinberg_propagates_everything() {
        assert_eq!(weight_sum(&FLOYD_STEINBERG), u32::from(FLOYD_STEINBERG.divisor));
    }

    #[test]
    fn test_atkinson_propagates_three_quarters() {
        assert_eq!(weight_sum(&ATKINSON) * 4, u32::from(ATKINSON.divisor) * 3);
    }

    #[test]
    fn test_kernels_only_reach_unvisited_pixels() {
        for kernel in [FLOYD_STEINBERG, ATKINSON] {
            for &(dx, dy, _) in kernel.entries {
                assert!(dy > 0 || (dy == 0 && dx > 0), "({dx}, {dy}) looks backwards");
            }
        }
    }
}
