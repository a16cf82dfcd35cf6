//! epd-dither: image to 4-bit e-paper frame encoding
//!
//! This library turns an arbitrary RGB image into the packed frame a
//! multi-color e-paper panel (such as a 7.3" Spectra 6 at 800x480) expects:
//! one 4-bit device code per pixel, two pixels per byte.
//!
//! # Quick Start
//!
//! The [`Encoder`] builder is the primary entry point:
//!
//! ```
//! use epd_dither::{Encoder, Palette};
//! use image::RgbImage;
//!
//! let encoder = Encoder::new(Palette::black_white(), 4, 2);
//! let source = RgbImage::from_pixel(4, 2, image::Rgb([127, 127, 127]));
//! let encoding = encoder.encode(&source).unwrap();
//!
//! assert_eq!(encoding.frame().as_bytes(), &[0x01, 0x01, 0x10, 0x10]);
//! ```
//!
//! # Pipeline Overview
//!
//! ```text
//! RgbImage (any size)
//!     |
//!     v
//! normalize()              crop-then-scale or scale-then-crop, Lanczos3
//!     |
//!     v
//! WorkingGrid              signed 16-bit channels, width x height
//!     |
//!     v
//! quantize()               raster-order error diffusion
//!     |   resolve -> code  (nearest palette color, lower code on ties)
//!     |   residual -> neighbours
//!     v
//! QuantizedGrid            one device code per pixel
//!     |
//!     v
//! pack()                   high nibble first, zero-filled odd tail
//!     |
//!     v
//! EncodedFrame             ceil(width * height / 2) bytes
//! ```
//!
//! # Palette Matching
//!
//! Distance is plain squared Euclidean distance over R, G and B. Device
//! codes are panel-specific and are not the palette position: Spectra 6
//! skips code 4, for instance. The [`Resolver`] trait abstracts the lookup;
//! [`Palette`] implements it with a linear scan and [`KdTreeResolver`] with
//! a 3-d tree. Both agree on every input, ties included.
//!
//! # Error Diffusion
//!
//! Residuals are split among unvisited neighbours using integer weights,
//! truncating toward zero. Accumulated values are bounded to
//! [`ACCUMULATION_MIN`]`..=`[`ACCUMULATION_MAX`]. Two kernels are built in:
//!
//! - Floyd-Steinberg (default, full propagation)
//! - Atkinson (75% propagation)

#![allow(clippy::module_inception)]

pub mod api;
pub mod color;
pub mod dither;
pub mod geometry;
pub mod output;
pub mod palette;


pub use api::{EncodeError, Encoder, Encoding};
pub use color::Rgb;
pub use dither::{
    quantize, DitherAlgorithm, Kernel, QuantizedGrid, WorkingGrid, ACCUMULATION_MAX,
    ACCUMULATION_MIN, ATKINSON, FLOYD_STEINBERG,
};
pub use geometry::{normalize, FitPolicy, Orientation};
pub use output::{
    encode_png_indexed, encode_png_rgb, pack, validate_palette, EncodedFrame, NIBBLE_MAX,
};
pub use palette::{
    KdTreeResolver, Palette, PaletteEntry, PaletteError, ParseColorError, Resolver, ResolverKind,
};
