pub mod config;
pub mod display_spec;

pub use config::{DeviceProfile, PaletteColor};
pub use display_spec::DisplaySpec;
