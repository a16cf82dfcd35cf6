use std::path::{Path, PathBuf};

use epd_dither::{encode_png_indexed, encode_png_rgb, Encoder, Encoding, Palette};
use image::RgbImage;

use crate::error::SenderError;
use crate::models::{DeviceProfile, DisplaySpec};
use crate::services::transport::{TransmitStatus, Transport};

/// Optional debug files written next to the frame
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    /// Normalized image before quantization (RGB PNG)
    pub normalized: Option<PathBuf>,
    /// Quantized result rendered with the palette colors (indexed PNG)
    pub preview: Option<PathBuf>,
}

/// Orchestrates decode -> encode -> validate -> deliver for one device
pub struct FramePipeline {
    encoder: Encoder,
    spec: DisplaySpec,
}

impl FramePipeline {
    pub fn new(encoder: Encoder) -> Self {
        let (width, height) = encoder.dimensions();
        Self {
            encoder,
            spec: DisplaySpec::new(width, height),
        }
    }

    pub fn from_profile(profile: &DeviceProfile) -> Result<Self, SenderError> {
        Ok(Self::new(profile.encoder()?))
    }

    pub fn palette(&self) -> &Palette {
        self.encoder.palette()
    }

    pub fn display_spec(&self) -> DisplaySpec {
        self.spec
    }

    /// Decode any supported image file and flatten it to 8-bit RGB
    pub fn load_image(path: &Path) -> Result<RgbImage, SenderError> {
        let image = image::open(path).map_err(|e| SenderError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Decoded source image"
        );
        Ok(image.to_rgb8())
    }

    /// Encode an in-memory image and check the frame against the panel
    pub fn encode(&self, image: &RgbImage) -> Result<Encoding, SenderError> {
        let encoding = self.encoder.encode(image)?;
        self.spec.validate_frame(encoding.frame())?;
        tracing::info!(
            width = self.spec.width,
            height = self.spec.height,
            bytes = encoding.frame().len(),
            rotated = encoding.rotated(),
            "Encoded frame"
        );
        Ok(encoding)
    }

    pub fn encode_file(&self, path: &Path) -> Result<Encoding, SenderError> {
        let image = Self::load_image(path)?;
        self.encode(&image)
    }

    /// Write the requested debug artifacts for an encoding
    pub fn write_artifacts(
        &self,
        encoding: &Encoding,
        artifacts: &Artifacts,
    ) -> Result<(), SenderError> {
        if let Some(path) = &artifacts.normalized {
            let png = encode_png_rgb(encoding.normalized())?;
            std::fs::write(path, png)?;
            tracing::info!(path = %path.display(), "Wrote normalized image");
        }
        if let Some(path) = &artifacts.preview {
            let png = encode_png_indexed(encoding.grid(), self.palette())?;
            std::fs::write(path, png)?;
            tracing::info!(path = %path.display(), "Wrote preview image");
        }
        Ok(())
    }

    /// Hand the frame to a transport; the status is reported, not acted on
    pub fn deliver(&self, encoding: &Encoding, transport: &dyn Transport) -> TransmitStatus {
        let status = transport.send(encoding.frame());
        if !status.is_ok() {
            tracing::warn!(%status, "Display did not accept the frame");
        }
        status
    }
}
