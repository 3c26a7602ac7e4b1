//! Analysis-service response model.
//!
//! Field names mirror the service wire format exactly; this struct is both
//! the deserialization target for `POST /analyze` responses and the value
//! serialized back as chat `context`.

use serde::{Deserialize, Serialize};

use crate::markup::{SummarySegment, parse_summary, strip_markup};

/// Health impact classification for a single ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

/// How confident the service is in a key point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Certainty {
    High,
    Medium,
    Low,
}

/// One ingredient the service called out, with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub ingredient: String,
    pub impact: Impact,
    pub why_it_matters: String,
    /// Optional on the wire; older service versions omit it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub certainty_level: Option<Certainty>,
}

/// Presentation tier derived from the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreVerdict {
    Excellent,
    Good,
    Moderate,
    ChangesRecommended,
}

impl ScoreVerdict {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreVerdict::Excellent => "Excellent Choice",
            ScoreVerdict::Good => "Good Choice",
            ScoreVerdict::Moderate => "Moderate",
            ScoreVerdict::ChangesRecommended => "Changes Recommended",
        }
    }
}

/// A completed health assessment for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 0 = toxic, 100 = superfood. Out-of-range service values are clamped.
    #[serde(deserialize_with = "clamp_score")]
    pub health_score: u8,
    /// One-sentence summary; may contain `{pos}`/`{neg}`/`{med}` markup.
    pub summary: String,
    pub key_points: Vec<KeyPoint>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub decision_guidance: Option<Vec<String>>,
}

impl AnalysisResult {
    /// Summary split into emphasis spans, markup stripped.
    #[must_use]
    pub fn summary_spans(&self) -> Vec<SummarySegment> {
        parse_summary(&self.summary)
    }

    /// Summary with all markup tags removed, for plain-text contexts.
    #[must_use]
    pub fn summary_plain(&self) -> String {
        strip_markup(&self.summary)
    }

    #[must_use]
    pub fn verdict(&self) -> ScoreVerdict {
        match self.health_score {
            85.. => ScoreVerdict::Excellent,
            65..=84 => ScoreVerdict::Good,
            40..=64 => ScoreVerdict::Moderate,
            _ => ScoreVerdict::ChangesRecommended,
        }
    }

    /// The serialized form sent as the `context` field of chat requests.
    #[must_use]
    pub fn context_json(&self) -> String {
        // Serialization of an owned value with string keys cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    #[must_use]
    pub fn guidance(&self) -> &[String] {
        self.decision_guidance.as_deref().unwrap_or_default()
    }
}

fn clamp_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.clamp(0.0, 100.0).round() as u8)
}
