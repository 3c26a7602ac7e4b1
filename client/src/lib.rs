//! HTTP client for the label analysis service.
//!
//! # Architecture
//!
//! The crate is organized around two JSON endpoints plus a listing call:
//!
//! - [`ApiClient::analyze`] - `POST /analyze`, one-shot health assessment
//! - [`ApiClient::chat`] - `POST /chat`, follow-up question with history
//! - [`ApiClient::samples`] - `GET /samples`, demo products to try
//!
//! [`LabelService`] abstracts the two request kinds the engine issues, so the
//! flow controller can be driven by a scripted fake in tests. [`ApiClient`]
//! is the production implementation.
//!
//! # Error Handling
//!
//! The service reports its own failures in the response body (`{error,
//! details?}`), sometimes with a 2xx status, so bodies are inspected before
//! status codes. Transport failures, body-reported faults, and undecodable
//! bodies map to the three [`ApiError`] variants. Cancellation is not an
//! error: callers abort the task driving a request, so a cancelled call
//! simply never resolves.

mod analyze;
mod chat;
mod samples;

pub use analyze::{AnalysisPayload, PayloadError};
pub use chat::ChatRequest;
pub use samples::{SampleProduct, builtin_samples};

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use labelens_types::AnalysisResult;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 120;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// A failed service call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed before a response body was read.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The service reported an error in the response body.
    #[error("service error: {error}")]
    Service {
        error: String,
        details: Option<String>,
    },
    /// Response body was not the expected shape.
    #[error("malformed service response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The string shown to the user. Service faults prefer `details` over
    /// `error`.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Service { error, details } => {
                details.clone().unwrap_or_else(|| error.clone())
            }
            ApiError::Network(_) | ApiError::Parse(_) => "Something went wrong.".to_string(),
        }
    }
}

/// Error body shape shared by both endpoints.
#[derive(Debug, Deserialize)]
struct ServiceFault {
    error: String,
    details: Option<String>,
}

impl From<ServiceFault> for ApiError {
    fn from(fault: ServiceFault) -> Self {
        ApiError::Service {
            error: fault.error,
            details: fault.details,
        }
    }
}

/// The two request kinds the flow controller issues.
///
/// Implemented by [`ApiClient`] for production; engine tests substitute a
/// scripted fake to control completion order.
#[async_trait]
pub trait LabelService: Send + Sync {
    async fn analyze(&self, payload: &AnalysisPayload) -> Result<AnalysisResult, ApiError>;
    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError>;
}

/// Shared HTTP client with connection pooling and timeouts.
pub(crate) fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build pooled HTTP client: {e}. Using defaults.");
                reqwest::Client::new()
            })
    })
}

/// Client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{path}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LabelService for ApiClient {
    async fn analyze(&self, payload: &AnalysisPayload) -> Result<AnalysisResult, ApiError> {
        self.analyze(payload).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        self.chat(request).await
    }
}

/// Decode a response, letting a body-reported fault win over the status code.
pub(crate) async fn decode_response<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.bytes().await?;

    if let Ok(fault) = serde_json::from_slice::<ServiceFault>(&body) {
        return Err(fault.into());
    }
    if !status.is_success() {
        return Err(ApiError::Service {
            error: format!("service returned {status}"),
            details: None,
        });
    }
    serde_json::from_slice(&body).map_err(ApiError::Parse)
}
