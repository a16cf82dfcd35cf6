//! epd-sender - push images to multi-color e-paper panels
//!
//! Decodes source images, encodes them into the panel's packed 4-bit frame
//! with `epd-dither`, and delivers the frame over HTTP.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;
