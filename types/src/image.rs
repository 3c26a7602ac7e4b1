//! Captured label images.
//!
//! Camera capture and crop math are collaborator concerns; what the engine
//! needs is the base64 payload the analyze endpoint expects, plus the
//! original data URL so a front end can keep showing the scan.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error("data URL has no base64 payload")]
    MissingPayload,
}

/// An image ready to be sent for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    payload: String,
    display_src: Option<String>,
}

impl CapturedImage {
    /// From a `data:image/...;base64,` URL as produced by camera capture
    /// or a file reader. The payload after the comma is what goes on the wire.
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self, ImageDecodeError> {
        let data_url = data_url.into();
        let payload = data_url
            .split_once(',')
            .map(|(_, payload)| payload)
            .filter(|payload| !payload.is_empty())
            .ok_or(ImageDecodeError::MissingPayload)?
            .to_string();
        Ok(Self {
            payload,
            display_src: Some(data_url),
        })
    }

    /// From raw image bytes (file upload path); encodes to base64.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            payload: BASE64.encode(bytes),
            display_src: None,
        }
    }

    /// The base64 payload for the `image_base64` request field.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Source suitable for display, when the capture path provided one.
    #[must_use]
    pub fn display_src(&self) -> Option<&str> {
        self.display_src.as_deref()
    }
}
