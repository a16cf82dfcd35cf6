//! Encoder builder, the primary entry point for the crate.
//!
//! [`Encoder`] wires the pipeline stages together behind a fluent
//! configuration API and returns an [`Encoding`] holding every intermediate
//! result a caller might want to inspect.

use image::RgbImage;

use super::EncodeError;
use crate::dither::{quantize, DitherAlgorithm, QuantizedGrid, WorkingGrid};
use crate::geometry::{normalize, FitPolicy, Orientation};
use crate::output::{pack, validate_palette, EncodedFrame};
use crate::palette::{KdTreeResolver, Palette, ResolverKind};

/// Image-to-frame encoder for one panel configuration.
///
/// - Constructor requires the [`Palette`] and target size
/// - Configuration methods consume and return `self`
/// - [`encode()`](Self::encode) takes `&self`, so one encoder can be shared
///   across threads and reused for any number of images
///
/// # Example
///
/// ```
/// use epd_dither::{DitherAlgorithm, Encoder, FitPolicy, Palette};
/// use image::RgbImage;
///
/// let encoder = Encoder::new(Palette::spectra6(), 800, 480)
///     .fit(FitPolicy::ScaleThenCrop)
///     .algorithm(DitherAlgorithm::FloydSteinberg);
///
/// let source = RgbImage::from_pixel(1024, 768, image::Rgb([255, 255, 255]));
/// let encoding = encoder.encode(&source).unwrap();
///
/// assert_eq!(encoding.frame().len(), 192_000);
/// assert!(encoding.frame().as_bytes().iter().all(|&b| b == 0x11));
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    palette: Palette,
    width: u32,
    height: u32,
    fit: FitPolicy,
    algorithm: DitherAlgorithm,
    resolver: ResolverKind,
    auto_rotate: bool,
}

impl Encoder {
    /// Create an encoder for a `width x height` panel.
    ///
    /// Defaults: crop-then-scale, Floyd-Steinberg, linear resolver, no
    /// auto-rotation.
    pub fn new(palette: Palette, width: u32, height: u32) -> Self {
        Self {
            palette,
            width,
            height,
            fit: FitPolicy::default(),
            algorithm: DitherAlgorithm::default(),
            resolver: ResolverKind::default(),
            auto_rotate: false,
        }
    }

    /// Set the geometry fit policy.
    pub fn fit(mut self, fit: FitPolicy) -> Self {
        self.fit = fit;
        self
    }

    /// Set the error diffusion algorithm.
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the nearest-color resolver.
    ///
    /// Both resolvers return identical codes; the k-d tree only pays off for
    /// large palettes.
    pub fn resolver(mut self, resolver: ResolverKind) -> Self {
        self.resolver = resolver;
        self
    }

    /// Rotate portrait sources onto a landscape panel.
    ///
    /// When enabled and the source is portrait while the panel is landscape,
    /// the source is normalized to the swapped size (`height x width`),
    /// quantized upright, then rotated counter-clockwise into the panel's
    /// native scan order. The frame always holds `width x height` codes.
    pub fn auto_rotate(mut self, enabled: bool) -> Self {
        self.auto_rotate = enabled;
        self
    }

    /// The palette this encoder quantizes to.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Target panel size as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Encode one image.
    ///
    /// Runs palette validation, geometry normalization, quantization and
    /// packing. Nothing is returned unless every stage succeeds.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::PaletteConfig`] if a device code is wider than 4 bits
    /// - [`EncodeError::MalformedInput`] for a zero-area source or target
    /// - [`EncodeError::DimensionMismatch`] if normalization misbehaves
    pub fn encode(&self, image: &RgbImage) -> Result<Encoding, EncodeError> {
        validate_palette(&self.palette)?;

        let (src_w, src_h) = image.dimensions();
        let rotated = self.auto_rotate
            && Orientation::of(src_w, src_h) == Orientation::Portrait
            && Orientation::of(self.width, self.height) == Orientation::Landscape;
        let (target_w, target_h) = if rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };

        let normalized = normalize(image, target_w, target_h, self.fit)?;
        if normalized.dimensions() != (target_w, target_h) {
            return Err(EncodeError::DimensionMismatch {
                expected: (target_w, target_h),
                actual: normalized.dimensions(),
            });
        }

        let grid = WorkingGrid::from_image(&normalized);
        let kernel = self.algorithm.kernel();
        let mut quantized = match self.resolver {
            ResolverKind::Linear => quantize(grid, &self.palette, kernel),
            ResolverKind::KdTree => quantize(grid, &KdTreeResolver::new(&self.palette), kernel),
        };
        tracing::debug!(
            algorithm = %self.algorithm,
            resolver = %self.resolver,
            width = target_w,
            height = target_h,
            "quantized image"
        );

        if rotated {
            quantized = quantized.rotate_ccw();
            tracing::debug!(src_w, src_h, "rotated portrait source onto landscape panel");
        }

        let frame = pack(&quantized)?;
        Ok(Encoding {
            normalized,
            grid: quantized,
            frame,
            rotated,
        })
    }
}

/// Result of [`Encoder::encode()`].
#[derive(Debug, Clone)]
pub struct Encoding {
    normalized: RgbImage,
    grid: QuantizedGrid,
    frame: EncodedFrame,
    rotated: bool,
}

impl Encoding {
    /// Image after geometry normalization, before quantization.
    ///
    /// For a rotated encoding this is still upright (portrait).
    pub fn normalized(&self) -> &RgbImage {
        &self.normalized
    }

    /// Device codes in panel scan order.
    pub fn grid(&self) -> &QuantizedGrid {
        &self.grid
    }

    /// Packed frame ready for transmission.
    pub fn frame(&self) -> &EncodedFrame {
        &self.frame
    }

    /// Consume the encoding and keep only the frame.
    pub fn into_frame(self) -> EncodedFrame {
        self.frame
    }

    /// Whether the source was rotated onto the panel.
    pub fn rotated(&self) -> bool {
        self.rotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::palette::{PaletteEntry, PaletteError};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_encoder_is_send_sync() {
        assert_send_sync::<Encoder>();
        assert_send_sync::<Encoding>();
    }

    #[test]
    fn test_gray_block_end_to_end() {
        let encoder = Encoder::new(Palette::black_white(), 4, 2);
        let source = RgbImage::from_pixel(4, 2, image::Rgb([127, 127, 127]));
        let encoding = encoder.encode(&source).unwrap();
        assert_eq!(encoding.grid().codes(), &[0, 1, 0, 1, 1, 0, 1, 0]);
        assert_eq!(encoding.frame().as_bytes(), &[0x01, 0x01, 0x10, 0x10]);
        assert!(!encoding.rotated());
    }

    #[test]
    fn test_encoder_is_reusable() {
        let encoder = Encoder::new(Palette::spectra6(), 16, 10);
        let source = RgbImage::from_fn(40, 30, |x, y| image::Rgb([x as u8 * 6, y as u8 * 8, 90]));
        let a = encoder.encode(&source).unwrap();
        let b = encoder.encode(&source).unwrap();
        assert_eq!(a.frame(), b.frame());
    }

    #[test]
    fn test_kdtree_resolver_matches_linear() {
        let source = RgbImage::from_fn(40, 30, |x, y| image::Rgb([x as u8 * 6, y as u8 * 8, 200]));
        let linear = Encoder::new(Palette::spectra6(), 16, 10).encode(&source).unwrap();
        let tree = Encoder::new(Palette::spectra6(), 16, 10)
            .resolver(ResolverKind::KdTree)
            .encode(&source)
            .unwrap();
        assert_eq!(linear.frame(), tree.frame());
    }

    #[test]
    fn test_wide_code_rejected_before_encoding() {
        let palette = Palette::new(vec![
            PaletteEntry::new(Rgb::new(0, 0, 0), 0),
            PaletteEntry::new(Rgb::new(255, 255, 255), 16),
        ])
        .unwrap();
        let source = RgbImage::new(4, 4);
        let error = Encoder::new(palette, 4, 4).encode(&source).unwrap_err();
        assert!(matches!(
            error,
            EncodeError::PaletteConfig(PaletteError::CodeTooWide { code: 16, .. })
        ));
    }

    #[test]
    fn test_zero_area_source_rejected() {
        let error = Encoder::new(Palette::black_white(), 4, 4)
            .encode(&RgbImage::new(0, 0))
            .unwrap_err();
        assert!(matches!(error, EncodeError::MalformedInput(_)));
    }

    #[test]
    fn test_portrait_source_rotated() {
        // Top half black, bottom half white, portrait 6x10 onto a 10x6 panel
        let source = RgbImage::from_fn(6, 10, |_, y| {
            if y < 5 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        let encoding = Encoder::new(Palette::black_white(), 10, 6)
            .auto_rotate(true)
            .encode(&source)
            .unwrap();

        assert!(encoding.rotated());
        assert_eq!(encoding.normalized().dimensions(), (6, 10));
        let grid = encoding.grid();
        assert_eq!((grid.width(), grid.height()), (10, 6));
        // Upright top (black) ends up on the left after the ccw turn
        for y in 0..6 {
            assert_eq!(grid.get(0, y), 0);
            assert_eq!(grid.get(9, y), 1);
        }
        assert_eq!(encoding.frame().pixel_count(), 60);
    }

    #[test]
    fn test_portrait_source_without_auto_rotate_is_cropped() {
        let source = RgbImage::from_pixel(6, 10, image::Rgb([255, 255, 255]));
        let encoding = Encoder::new(Palette::black_white(), 10, 6)
            .encode(&source)
            .unwrap();
        assert!(!encoding.rotated());
        assert_eq!(encoding.normalized().dimensions(), (10, 6));
    }
}
