use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use epd_dither::{
    DitherAlgorithm, Encoder, FitPolicy, Palette, PaletteEntry, PaletteError, ResolverKind, Rgb,
    NIBBLE_MAX,
};
use serde::{Deserialize, Deserializer};

use super::DisplaySpec;
use crate::error::ConfigError;

/// Device profile loaded from a YAML file.
///
/// Every key is optional; a missing file section falls back to the 7.3"
/// Spectra 6 panel with its stock palette.
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceProfile {
    /// Panel width in its native orientation
    #[serde(default = "default_width")]
    pub width: u32,

    /// Panel height in its native orientation
    #[serde(default = "default_height")]
    pub height: u32,

    /// Geometry policy: `crop-then-scale` or `scale-then-crop`
    #[serde(default, deserialize_with = "parse_str")]
    pub fit: FitPolicy,

    /// Error diffusion kernel: `floyd-steinberg` or `atkinson`
    #[serde(default, deserialize_with = "parse_str")]
    pub dither: DitherAlgorithm,

    /// Nearest-color lookup: `linear` or `kd-tree`
    #[serde(default, deserialize_with = "parse_str")]
    pub resolver: ResolverKind,

    /// Rotate portrait sources onto the landscape panel
    #[serde(default = "default_auto_rotate")]
    pub auto_rotate: bool,

    /// URL the packed frame is POSTed to
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Device palette; defaults to Spectra 6 when absent
    #[serde(default)]
    pub palette: Option<Vec<PaletteColor>>,
}

/// One ink of a configured palette.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PaletteColor {
    /// Human-readable name, used in error messages and `palette` output
    pub name: String,

    /// Reference color as `#RRGGBB` or `#RGB`
    pub color: String,

    /// Device code sent for this ink (0-15)
    pub code: u8,
}

fn default_width() -> u32 {
    DisplaySpec::SPECTRA6_7IN3.width
}

fn default_height() -> u32 {
    DisplaySpec::SPECTRA6_7IN3.height
}

fn default_auto_rotate() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn parse_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

impl DeviceProfile {
    /// Load and validate a profile from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            width = profile.width,
            height = profile.height,
            fit = %profile.fit,
            dither = %profile.dither,
            "Loaded device profile"
        );
        Ok(profile)
    }

    /// Parse and validate a profile from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document means "all defaults"
        let profile: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "width/height",
                message: format!("panel size {}x{} has no area", self.width, self.height),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        self.palette()?;
        Ok(())
    }

    pub fn display_spec(&self) -> DisplaySpec {
        DisplaySpec::new(self.width, self.height)
    }

    /// Build the palette, checking colors, code uniqueness and code width
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let Some(colors) = &self.palette else {
            return Ok(Palette::spectra6());
        };

        let mut entries = Vec::with_capacity(colors.len());
        for c in colors {
            let entry_error = |source: PaletteError| ConfigError::PaletteEntry {
                name: c.name.clone(),
                source,
            };
            let rgb: Rgb = c.color.parse().map_err(|e| entry_error(PaletteError::from(e)))?;
            if c.code > NIBBLE_MAX {
                return Err(entry_error(PaletteError::CodeTooWide {
                    code: c.code,
                    max: NIBBLE_MAX,
                }));
            }
            entries.push(PaletteEntry::new(rgb, c.code));
        }
        Ok(Palette::new(entries)?)
    }

    /// Configure an encoder for this profile
    pub fn encoder(&self) -> Result<Encoder, ConfigError> {
        Ok(Encoder::new(self.palette()?, self.width, self.height)
            .fit(self.fit)
            .algorithm(self.dither)
            .resolver(self.resolver)
            .auto_rotate(self.auto_rotate))
    }

    /// Name for a device code, if the profile defines one
    pub fn color_name(&self, code: u8) -> Option<&str> {
        match &self.palette {
            Some(colors) => colors
                .iter()
                .find(|c| c.code == code)
                .map(|c| c.name.as_str()),
            None => SPECTRA6_NAMES
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, name)| *name),
        }
    }
}

const SPECTRA6_NAMES: [(u8, &str); 6] = [
    (0x0, "black"),
    (0x1, "white"),
    (0x2, "yellow"),
    (0x3, "red"),
    (0x5, "blue"),
    (0x6, "green"),
];

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fit: FitPolicy::default(),
            dither: DitherAlgorithm::default(),
            resolver: ResolverKind::default(),
            auto_rotate: default_auto_rotate(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            palette: None,
        }
    }
}
