//! `GET /samples` - demo products the user can try without a label.

use serde::Deserialize;

use crate::{ApiClient, ApiError, decode_response, http_client};

/// A demo product the service can analyze by id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SampleProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ingredients: Option<String>,
}

impl SampleProduct {
    fn known(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ingredients: None,
        }
    }
}

/// The sample set every deployment ships with, for when the listing endpoint
/// is unreachable.
#[must_use]
pub fn builtin_samples() -> Vec<SampleProduct> {
    vec![
        SampleProduct::known("sample_01", "Biscuits"),
        SampleProduct::known("sample_02", "Noodles"),
        SampleProduct::known("sample_03", "Yogurt"),
        SampleProduct::known("sample_04", "Soda"),
        SampleProduct::known("sample_05", "Ketchup"),
        SampleProduct::known("sample_07", "Chocolate"),
    ]
}

impl ApiClient {
    pub async fn samples(&self) -> Result<Vec<SampleProduct>, ApiError> {
        let response = http_client()
            .get(self.endpoint("samples"))
            .send()
            .await
            .inspect_err(|e| tracing::warn!("samples request failed: {e}"))?;

        decode_response(response).await
    }
}
