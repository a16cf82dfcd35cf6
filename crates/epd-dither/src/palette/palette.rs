//! Palette struct with device codes and nearest-color matching.
//!
//! A [`Palette`] is an immutable, ordered set of reference colors, each
//! tagged with the numeric code the panel controller interprets as an ink.
//! It is built once per device profile and passed by reference into every
//! encode call, so several profiles can coexist in one process.

use std::collections::HashSet;

use super::error::PaletteError;
use super::resolver::Resolver;
use crate::color::Rgb;

/// A palette color paired with its device code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    /// Reference color used for matching.
    pub color: Rgb,
    /// Code sent to the device for this ink.
    pub code: u8,
}

impl PaletteEntry {
    /// Create a new entry.
    #[inline]
    pub const fn new(color: Rgb, code: u8) -> Self {
        Self { color, code }
    }
}

/// An immutable set of palette entries with unique device codes.
///
/// Entries are kept sorted by device code. The linear scan in
/// [`find_nearest()`](Palette::find_nearest) relies on this ordering for its
/// tie-break: of two equidistant entries the one with the lower code wins,
/// whatever order the caller listed them in.
///
/// # Example
///
/// ```
/// use epd_dither::{Palette, PaletteEntry, Rgb};
///
/// let palette = Palette::new(vec![
///     PaletteEntry::new(Rgb::new(255, 255, 255), 1),
///     PaletteEntry::new(Rgb::new(0, 0, 0), 0),
/// ])
/// .unwrap();
///
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.codes(), vec![0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Create a palette from a list of entries.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::Empty`] if `entries` is empty
    /// - [`PaletteError::DuplicateCode`] if two entries share a device code
    pub fn new(mut entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::Empty);
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.code) {
                return Err(PaletteError::DuplicateCode { code: entry.code });
            }
        }

        entries.sort_by_key(|e| e.code);
        Ok(Self { entries })
    }

    /// Create a palette from `(hex color, code)` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use epd_dither::Palette;
    ///
    /// let palette = Palette::from_hex(&[("#000", 0), ("#FFFFFF", 1)]).unwrap();
    /// assert_eq!(palette.len(), 2);
    /// ```
    pub fn from_hex(pairs: &[(&str, u8)]) -> Result<Self, PaletteError> {
        let entries = pairs
            .iter()
            .map(|&(hex, code)| Ok(PaletteEntry::new(hex.parse::<Rgb>()?, code)))
            .collect::<Result<Vec<_>, PaletteError>>()?;
        Self::new(entries)
    }

    /// Two-ink black/white palette: Black → 0, White → 1.
    pub fn black_white() -> Self {
        Self {
            entries: vec![
                PaletteEntry::new(Rgb::new(0, 0, 0), 0x0),
                PaletteEntry::new(Rgb::new(255, 255, 255), 0x1),
            ],
        }
    }

    /// Six-ink palette of the 7.3" color panel.
    ///
    /// Code 0x4 is not used by the controller.
    pub fn spectra6() -> Self {
        Self {
            entries: vec![
                PaletteEntry::new(Rgb::new(0, 0, 0), 0x0),       // black
                PaletteEntry::new(Rgb::new(255, 255, 255), 0x1), // white
                PaletteEntry::new(Rgb::new(255, 255, 0), 0x2),   // yellow
                PaletteEntry::new(Rgb::new(255, 0, 0), 0x3),     // red
                PaletteEntry::new(Rgb::new(0, 0, 255), 0x5),     // blue
                PaletteEntry::new(Rgb::new(0, 255, 0), 0x6),     // green
            ],
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending device-code order.
    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Device codes in ascending order.
    pub fn codes(&self) -> Vec<u8> {
        self.entries.iter().map(|e| e.code).collect()
    }

    /// Whether `code` belongs to this palette.
    pub fn contains_code(&self, code: u8) -> bool {
        self.get(code).is_some()
    }

    /// Look up the entry for a device code.
    pub fn get(&self, code: u8) -> Option<&PaletteEntry> {
        self.entries
            .binary_search_by_key(&code, |e| e.code)
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Largest device code in the palette.
    pub fn max_code(&self) -> u8 {
        // Sorted by code and never empty
        self.entries.last().map_or(0, |e| e.code)
    }

    /// Find the entry nearest to a signed pixel value by linear scan.
    ///
    /// Returns the entry and its squared distance. Values outside 0..=255
    /// are compared as-is; accumulated diffusion error is never clamped
    /// before matching.
    ///
    /// # Example
    ///
    /// ```
    /// use epd_dither::Palette;
    ///
    /// let palette = Palette::black_white();
    /// let (entry, _) = palette.find_nearest([10, 10, 10]);
    /// assert_eq!(entry.code, 0);
    /// let (entry, _) = palette.find_nearest([200, 200, 200]);
    /// assert_eq!(entry.code, 1);
    /// ```
    #[inline]
    pub fn find_nearest(&self, pixel: [i16; 3]) -> (PaletteEntry, u64) {
        // Linear scan - optimal for small palettes (4-16 entries typical)
        let mut best = self.entries[0];
        let mut best_dist = best.color.squared_distance(pixel);

        for &entry in &self.entries[1..] {
            let dist = entry.color.squared_distance(pixel);
            // Strict comparison keeps the lower code on ties
            if dist < best_dist {
                best_dist = dist;
                best = entry;
            }
        }

        (best, best_dist)
    }
}

impl Resolver for Palette {
    #[inline]
    fn resolve(&self, pixel: [i16; 3]) -> PaletteEntry {
        self.find_nearest(pixel).0
    }
}
