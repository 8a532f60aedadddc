pub mod assets;
pub mod detect;

use crate::errors::ApiError;

pub async fn health() -> &'static str {
    "OK"
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
