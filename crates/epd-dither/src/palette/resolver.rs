//! Nearest-color resolver contract.

use std::fmt;
use std::str::FromStr;

use super::palette::PaletteEntry;

/// Maps a pixel to its closest palette entry.
///
/// Implementations must minimise squared Euclidean distance in RGB space and
/// break ties in favour of the lower device code, so every resolver yields
/// byte-identical output for the same palette.
pub trait Resolver {
    /// Resolve a signed pixel value (channels may lie outside 0..=255).
    fn resolve(&self, pixel: [i16; 3]) -> PaletteEntry;
}

impl<R: Resolver + ?Sized> Resolver for &R {
    #[inline]
    fn resolve(&self, pixel: [i16; 3]) -> PaletteEntry {
        (**self).resolve(pixel)
    }
}

/// Resolver selection for the [`Encoder`](crate::Encoder).
///
/// Both strategies return identical results; the k-d tree only pays off
/// for palettes far larger than the 4-8 inks of real panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverKind {
    /// Linear scan over all entries.
    #[default]
    Linear,
    /// k-d tree over palette colors.
    KdTree,
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverKind::Linear => f.write_str("linear"),
            ResolverKind::KdTree => f.write_str("kd-tree"),
        }
    }
}

impl FromStr for ResolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(ResolverKind::Linear),
            "kd-tree" | "kdtree" => Ok(ResolverKind::KdTree),
            other => Err(format!(
                "unknown resolver '{other}' (expected linear or kd-tree)"
            )),
        }
    }
}
