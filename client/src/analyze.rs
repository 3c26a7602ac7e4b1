//! `POST /analyze` - one-shot label assessment.

use serde::Serialize;
use thiserror::Error;

use labelens_types::{AnalysisResult, CapturedImage};

use crate::{ApiClient, ApiError, decode_response, http_client};

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("provide ingredients text, an image, or a sample id")]
    Empty,
}

/// What to analyze. Exactly one input kind per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisPayload {
    /// Photographed or uploaded label image.
    Image(CapturedImage),
    /// Raw ingredient list typed or pasted by the user.
    Ingredients(String),
    /// One of the demo products the service knows by id.
    Sample(String),
}

impl AnalysisPayload {
    #[must_use]
    pub fn image(image: CapturedImage) -> Self {
        AnalysisPayload::Image(image)
    }

    pub fn ingredients(text: impl Into<String>) -> Result<Self, PayloadError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(PayloadError::Empty);
        }
        Ok(AnalysisPayload::Ingredients(text))
    }

    pub fn sample(id: impl Into<String>) -> Result<Self, PayloadError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PayloadError::Empty);
        }
        Ok(AnalysisPayload::Sample(id))
    }

    fn body(&self) -> AnalyzeBody<'_> {
        match self {
            AnalysisPayload::Image(image) => AnalyzeBody {
                image_base64: Some(image.payload()),
                ..AnalyzeBody::default()
            },
            AnalysisPayload::Ingredients(text) => AnalyzeBody {
                ingredients: Some(text),
                ..AnalyzeBody::default()
            },
            AnalysisPayload::Sample(id) => AnalyzeBody {
                sample_id: Some(id),
                ..AnalyzeBody::default()
            },
        }
    }
}

/// Wire body. The service requires exactly one field populated; the
/// [`AnalysisPayload`] enum makes any other combination unrepresentable.
#[derive(Debug, Default, Serialize)]
struct AnalyzeBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    image_base64: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ingredients: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_id: Option<&'a str>,
}

impl ApiClient {
    pub async fn analyze(&self, payload: &AnalysisPayload) -> Result<AnalysisResult, ApiError> {
        let response = http_client()
            .post(self.endpoint("analyze"))
            .json(&payload.body())
            .send()
            .await
            .inspect_err(|e| tracing::warn!("analyze request failed: {e}"))?;

        decode_response(response).await
    }
}
