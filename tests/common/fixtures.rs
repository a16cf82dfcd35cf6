//! Test fixtures: source images and device profiles on disk.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tempfile::TempDir;

/// Profile for a tiny black/white/red panel
pub const SMALL_PROFILE: &str = r##"
width: 8
height: 4
fit: crop-then-scale
dither: floyd-steinberg
palette:
  - { name: black, color: "#000000", code: 0 }
  - { name: white, color: "#FFFFFF", code: 1 }
  - { name: red,   color: "#FF0000", code: 3 }
"##;

/// Horizontal gradient from black to white
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1).max(1)) as u8;
        image::Rgb([v, v, v])
    })
}

/// Top half `top`, bottom half `bottom`
pub fn split_vertical(width: u32, height: u32, top: [u8; 3], bottom: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| {
        if y < height / 2 {
            image::Rgb(top)
        } else {
            image::Rgb(bottom)
        }
    })
}

/// Save an image as PNG inside `dir`
pub fn write_png(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("Failed to write test image");
    path
}

/// Write a YAML profile inside `dir`
pub fn write_profile(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("profile.yaml");
    std::fs::write(&path, yaml).expect("Failed to write test profile");
    path
}

pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}
