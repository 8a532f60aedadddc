use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    multipart::{Form, Part},
};

use super::{DetectionError, DetectionResult, Detector, extract_score};
use crate::config::SightengineConfig;

/// Client for the Sightengine `check.json` endpoint.
#[derive(Clone)]
pub struct SightengineClient {
    config: SightengineConfig,
    client: Client,
}

impl SightengineClient {
    pub fn new(config: SightengineConfig) -> Result<Self, DetectionError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    async fn form(&self, path: &Path) -> Result<Form, DetectionError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(DetectionError::ReadFile)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Form::new()
            .text("models", self.config.models.clone())
            .text("api_user", self.config.api_user.clone())
            .text("api_secret", self.config.api_secret.clone())
            .part("media", Part::bytes(bytes).file_name(file_name)))
    }
}

#[async_trait]
impl Detector for SightengineClient {
    async fn check(&self, path: &Path) -> Result<DetectionResult, DetectionError> {
        let form = self.form(path).await?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        tracing::info!(%status, "detection service responded");

        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(DetectionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = serde_json::from_str(&body).map_err(DetectionError::InvalidJson)?;
        extract_score(raw)
    }
}
