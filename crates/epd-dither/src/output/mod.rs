//! Output stage of the pipeline.
//!
//! - [`pack()`] turns a [`QuantizedGrid`](crate::QuantizedGrid) into the
//!   panel's 4-bit wire format ([`EncodedFrame`]).
//! - [`encode_png_rgb()`] and [`encode_png_indexed()`] write optional debug
//!   artifacts.

mod artifact;
mod pack;

pub use self::artifact::{encode_png_indexed, encode_png_rgb};
pub use self::pack::{pack, validate_palette, EncodedFrame, NIBBLE_MAX};
