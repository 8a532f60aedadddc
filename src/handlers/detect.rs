use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Multipart, multipart::MultipartRejection},
};
use tracing::instrument;

use crate::detection::{DetectionResult, Detector};
use crate::errors::ApiError;
use crate::storage::{ScratchDir, Upload};

const IMAGE_FIELD: &str = "image";

/// Stages the `image` field, forwards it to the detector and relays the score.
///
/// The staged file is removed before this returns, whatever the outcome.
#[instrument(skip_all)]
pub async fn detect(
    Extension(scratch): Extension<Arc<ScratchDir>>,
    Extension(detector): Extension<Arc<dyn Detector>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectionResult>, ApiError> {
    let upload = read_image_field(multipart?).await?;
    tracing::info!(
        filename = %upload.filename,
        content_type = ?upload.content_type,
        size = upload.bytes.len(),
        "received upload"
    );

    let staged = scratch.stage(&upload).await?;
    let outcome = detector.check(staged.path()).await;
    let cleanup = staged.remove().await;

    let result = outcome?;
    cleanup?;

    tracing::info!(ai_score = result.ai_score, "detection complete");
    Ok(Json(result))
}

async fn read_image_field(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }
        let content_type = field.content_type().and_then(|m| m.parse().ok());
        let bytes = field.bytes().await?;

        return Ok(Upload {
            bytes: bytes.to_vec(),
            content_type,
            filename,
        });
    }

    Err(ApiError::MissingFile)
}
