mod sightengine;

pub use sightengine::SightengineClient;

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Score reported by the external service together with its full response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub ai_score: f64,
    pub raw_response: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("API request failed with status code {status}: {body}")]
    Status { status: u16, body: String },
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned a non-JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Could not determine AI score from API response")]
    MissingScore,
    #[error("Could not read staged upload: {0}")]
    ReadFile(#[source] std::io::Error),
}

#[async_trait]
pub trait Detector: Send + Sync + 'static {
    /// Submits the file at `path` and returns the AI-generated likelihood.
    async fn check(&self, path: &Path) -> Result<DetectionResult, DetectionError>;
}

/// Pulls `type.ai_generated` out of a successful response.
pub fn extract_score(raw_response: serde_json::Value) -> Result<DetectionResult, DetectionError> {
    let ai_score = raw_response
        .pointer("/type/ai_generated")
        .and_then(serde_json::Value::as_f64)
        .ok_or(DetectionError::MissingScore)?;

    Ok(DetectionResult {
        ai_score,
        raw_response,
    })
}
