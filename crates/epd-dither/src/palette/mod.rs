//! Palette types and nearest-color resolution
//!
//! This module provides the device palette, the [`Resolver`] contract used
//! by the quantizer, and its two implementations (linear scan on
//! [`Palette`] and [`KdTreeResolver`]).

mod error;
mod kdtree;
mod palette;
mod resolver;

pub use error::{PaletteError, ParseColorError};
pub use kdtree::KdTreeResolver;
pub use palette::{Palette, PaletteEntry};
pub use resolver::{Resolver, ResolverKind};
