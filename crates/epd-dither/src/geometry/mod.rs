//! Geometry normalization to the panel resolution.
//!
//! Arbitrary source images are brought to the exact target size without
//! distorting their aspect ratio. Two center-anchored policies are offered:
//!
//! - [`FitPolicy::CropThenScale`] (default): cut the largest centered
//!   rectangle with the target aspect ratio out of the source, then Lanczos
//!   resample it to the target size.
//! - [`FitPolicy::ScaleThenCrop`]: scale the source so it fully covers the
//!   target and keep the centered target-sized window. Only the source
//!   region behind that window is resampled (see [`cover_window`]).
//!
//! Both produce exactly `width x height` pixels and both are deterministic.
//! A source that already has the target size is returned untouched.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::api::EncodeError;

/// How the source is fitted to the target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitPolicy {
    /// Crop a centered region with the target aspect ratio, then resize.
    #[default]
    CropThenScale,
    /// Resize to cover the target, then crop a centered window.
    ScaleThenCrop,
}

impl fmt::Display for FitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitPolicy::CropThenScale => f.write_str("crop-then-scale"),
            FitPolicy::ScaleThenCrop => f.write_str("scale-then-crop"),
        }
    }
}

impl FromStr for FitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crop-then-scale" | "crop" => Ok(FitPolicy::CropThenScale),
            "scale-then-crop" | "cover" => Ok(FitPolicy::ScaleThenCrop),
            other => Err(format!(
                "unknown fit policy '{other}' (expected crop-then-scale or scale-then-crop)"
            )),
        }
    }
}

/// Orientation of a rectangle. Square counts as landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Width >= height
    Landscape,
    /// Height > width
    Portrait,
}

impl Orientation {
    /// Classify a `width x height` rectangle.
    pub fn of(width: u32, height: u32) -> Self {
        if height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// Normalize `image` to exactly `width x height` pixels.
///
/// # Errors
///
/// Returns [`EncodeError::MalformedInput`] if the source or the target has
/// a zero dimension.
///
/// # Example
///
/// ```
/// use epd_dither::{normalize, FitPolicy};
/// use image::RgbImage;
///
/// let source = RgbImage::new(1920, 1080);
/// let out = normalize(&source, 800, 480, FitPolicy::CropThenScale).unwrap();
/// assert_eq!(out.dimensions(), (800, 480));
/// ```
pub fn normalize(
    image: &RgbImage,
    width: u32,
    height: u32,
    policy: FitPolicy,
) -> Result<RgbImage, EncodeError> {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(EncodeError::MalformedInput(format!(
            "source image is {src_w}x{src_h}"
        )));
    }
    if width == 0 || height == 0 {
        return Err(EncodeError::MalformedInput(format!(
            "target size is {width}x{height}"
        )));
    }

    if (src_w, src_h) == (width, height) {
        tracing::debug!(width, height, "source already at target size");
        return Ok(image.clone());
    }

    let out = match policy {
        FitPolicy::CropThenScale => crop_then_scale(image, width, height),
        FitPolicy::ScaleThenCrop => scale_then_crop(image, width, height),
    };
    tracing::debug!(
        src_w,
        src_h,
        width,
        height,
        policy = %policy,
        "normalized image geometry"
    );
    Ok(out)
}

/// Largest centered rectangle of the source with the target aspect ratio.
///
/// Returns `(left, top, crop_w, crop_h)`. Aspect ratios are compared by
/// cross-multiplication so equal ratios are detected exactly; on a tie the
/// width is kept.
pub fn center_crop_rect(src_w: u32, src_h: u32, width: u32, height: u32) -> (u32, u32, u32, u32) {
    let (sw, sh, tw, th) = (
        u64::from(src_w),
        u64::from(src_h),
        u64::from(width),
        u64::from(height),
    );

    if sw * th > tw * sh {
        // Wider than the target: trim left and right
        let new_w = ((sh * tw / th) as u32).clamp(1, src_w);
        ((src_w - new_w) / 2, 0, new_w, src_h)
    } else {
        // Taller or equal: trim top and bottom
        let new_h = ((sw * th / tw) as u32).clamp(1, src_h);
        (0, (src_h - new_h) / 2, src_w, new_h)
    }
}

fn crop_then_scale(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = image.dimensions();
    let (left, top, crop_w, crop_h) = center_crop_rect(src_w, src_h, width, height);
    let cropped = imageops::crop_imm(image, left, top, crop_w, crop_h).to_image();

    if cropped.dimensions() == (width, height) {
        return cropped;
    }
    imageops::resize(&cropped, width, height, FilterType::Lanczos3)
}

/// Size of the source scaled to cover the target, never smaller than it.
///
/// The bound axis matches the target exactly; the other is rounded up.
pub fn cover_size(src_w: u32, src_h: u32, width: u32, height: u32) -> (u32, u32) {
    let (sw, sh, tw, th) = (
        u64::from(src_w),
        u64::from(src_h),
        u64::from(width),
        u64::from(height),
    );
    let saturate = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);

    if sw * th > tw * sh {
        (saturate((sw * th).div_ceil(sh)), height)
    } else {
        (width, saturate((sh * tw).div_ceil(sw)))
    }
}

/// Region of the source that survives the centered crop of the covering
/// scale, as `(left, top, window_w, window_h)` in source pixels.
///
/// Mapping the crop back into source coordinates keeps the resample
/// bounded by the target size, whatever the source aspect ratio.
pub fn cover_window(src_w: u32, src_h: u32, width: u32, height: u32) -> (u32, u32, u32, u32) {
    let (sw, sh, tw, th) = (
        u64::from(src_w),
        u64::from(src_h),
        u64::from(width),
        u64::from(height),
    );
    let (scaled_w, scaled_h) = cover_size(src_w, src_h, width, height);

    if sw * th > tw * sh {
        // Height-bound: source pixels per scaled pixel is sh / th
        let left = ((u64::from(scaled_w) - tw) / 2 * sh / th).min(sw - 1);
        let window_w = (tw * sh).div_ceil(th).clamp(1, sw - left);
        (left as u32, 0, window_w as u32, src_h)
    } else {
        // Width-bound: source pixels per scaled pixel is sw / tw
        let top = ((u64::from(scaled_h) - th) / 2 * sw / tw).min(sh - 1);
        let window_h = (th * sw).div_ceil(tw).clamp(1, sh - top);
        (0, top as u32, src_w, window_h as u32)
    }
}

fn scale_then_crop(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = image.dimensions();
    let (left, top, window_w, window_h) = cover_window(src_w, src_h, width, height);
    let window = imageops::crop_imm(image, left, top, window_w, window_h).to_image();

    if window.dimensions() == (width, height) {
        return window;
    }
    imageops::resize(&window, width, height, FilterType::Lanczos3)
}
