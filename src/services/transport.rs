use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use epd_dither::EncodedFrame;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::error::SenderError;

/// Header carrying the number of pixels in the frame
pub const PIXEL_COUNT_HEADER: &str = "X-Pixel-Count";

/// Outcome of one transmission attempt, as reported by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitStatus {
    /// Receiver accepted the frame
    Ok,
    /// Receiver rejected the frame size
    SizeMismatch,
    /// Receiver answered with any other error
    Failed,
    /// Receiver could not be reached
    Unreachable,
}

impl TransmitStatus {
    /// Map an HTTP status code onto a transmit status
    pub fn from_http(status: StatusCode) -> Self {
        if status.is_success() {
            TransmitStatus::Ok
        } else if status == StatusCode::PAYLOAD_TOO_LARGE
            || status == StatusCode::UNPROCESSABLE_ENTITY
        {
            TransmitStatus::SizeMismatch
        } else {
            TransmitStatus::Failed
        }
    }

    pub fn is_ok(self) -> bool {
        self == TransmitStatus::Ok
    }
}

impl fmt::Display for TransmitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransmitStatus::Ok => f.write_str("ok"),
            TransmitStatus::SizeMismatch => f.write_str("size mismatch"),
            TransmitStatus::Failed => f.write_str("failed"),
            TransmitStatus::Unreachable => f.write_str("unreachable"),
        }
    }
}

/// Delivers a packed frame to the display, once
pub trait Transport: Send + Sync {
    fn send(&self, frame: &EncodedFrame) -> TransmitStatus;
}

/// Posts frames as `application/octet-stream` over HTTP
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SenderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SenderError::Client(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn send(&self, frame: &EncodedFrame) -> TransmitStatus {
        let result = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(PIXEL_COUNT_HEADER, frame.pixel_count().to_string())
            .body(frame.as_bytes().to_vec())
            .send();

        let status = match result {
            Ok(response) => {
                let status = TransmitStatus::from_http(response.status());
                tracing::debug!(http_status = %response.status(), "Receiver responded");
                status
            }
            Err(e) if e.is_connect() || e.is_timeout() => {
                tracing::warn!(endpoint = %self.endpoint, %e, "Receiver unreachable");
                TransmitStatus::Unreachable
            }
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, %e, "Transmission failed");
                TransmitStatus::Failed
            }
        };

        tracing::info!(
            endpoint = %self.endpoint,
            bytes = frame.len(),
            %status,
            "Frame transmitted"
        );
        status
    }
}

/// Keeps every frame in memory and answers with a fixed status
pub struct MemoryTransport {
    frames: Mutex<Vec<EncodedFrame>>,
    status: TransmitStatus,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::with_status(TransmitStatus::Ok)
    }

    pub fn with_status(status: TransmitStatus) -> Self {
        Self {
            frames: Mutex::new(Vec::new()),
            status,
        }
    }

    /// Frames received so far, oldest first
    pub fn frames(&self) -> Vec<EncodedFrame> {
        match self.frames.lock() {
            Ok(frames) => frames.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn send(&self, frame: &EncodedFrame) -> TransmitStatus {
        let mut frames = match self.frames.lock() {
            Ok(frames) => frames,
            Err(poisoned) => poisoned.into_inner(),
        };
        frames.push(frame.clone());
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epd_dither::{pack, QuantizedGrid};

    #[test]
    fn test_status_from_http() {
        assert_eq!(TransmitStatus::from_http(StatusCode::OK), TransmitStatus::Ok);
        assert_eq!(
            TransmitStatus::from_http(StatusCode::NO_CONTENT),
            TransmitStatus::Ok
        );
        assert_eq!(
            TransmitStatus::from_http(StatusCode::PAYLOAD_TOO_LARGE),
            TransmitStatus::SizeMismatch
        );
        assert_eq!(
            TransmitStatus::from_http(StatusCode::UNPROCESSABLE_ENTITY),
            TransmitStatus::SizeMismatch
        );
        assert_eq!(
            TransmitStatus::from_http(StatusCode::INTERNAL_SERVER_ERROR),
            TransmitStatus::Failed
        );
        assert_eq!(
            TransmitStatus::from_http(StatusCode::NOT_FOUND),
            TransmitStatus::Failed
        );
    }

    #[test]
    fn test_memory_transport_records_frames() {
        let transport = MemoryTransport::with_status(TransmitStatus::SizeMismatch);
        let frame = pack(&QuantizedGrid::new(vec![1, 2], 2, 1).unwrap()).unwrap();
        assert_eq!(transport.send(&frame), TransmitStatus::SizeMismatch);
        assert_eq!(transport.frames(), vec![frame]);
    }
}
