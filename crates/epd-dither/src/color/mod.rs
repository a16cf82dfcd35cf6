//! Color types
//!
//! The pipeline works in plain 8-bit RGB space: palette matching uses
//! Euclidean distance over the three channels, and error diffusion runs on
//! widened signed copies of the same values.

mod rgb;

pub use rgb::Rgb;
