//! Public API for the epd-dither crate.
//!
//! This module provides the high-level API: [`Encoder`] builder, its
//! [`Encoding`] result and the unified [`EncodeError`] type.

mod builder;
mod error;

pub use builder::{Encoder, Encoding};
pub use error::EncodeError;
