use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::detection::DetectionError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No image file provided")]
    MissingFile,
    #[error("No image selected")]
    EmptyFilename,
    #[error("Invalid multipart body: {message}")]
    Multipart { status: StatusCode, message: String },
    #[error(transparent)]
    Detection(#[from] DetectionError),
    #[error("Scratch storage failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::EmptyFilename => StatusCode::BAD_REQUEST,
            ApiError::Multipart { status, .. } => *status,
            ApiError::Detection(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Multipart {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::warn!(%status, %message, "request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
