use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::detection::Detector;
use crate::handlers::{self, assets::AssetDir};
use crate::storage::ScratchDir;

/// Collaborators shared by every request.
#[derive(Clone)]
pub struct Services {
    pub detector: Arc<dyn Detector>,
    pub scratch: Arc<ScratchDir>,
    pub assets: Arc<AssetDir>,
    pub max_upload_bytes: usize,
}

pub fn router(services: Services) -> Router {
    Router::new()
        .route("/", get(handlers::assets::index))
        .route("/script.js", get(handlers::assets::script))
        .route("/style.css", get(handlers::assets::style))
        .route("/health", get(handlers::health))
        .route(
            "/detect",
            post(handlers::detect::detect)
                .layer(DefaultBodyLimit::max(services.max_upload_bytes)),
        )
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(services.detector))
                .layer(Extension(services.scratch))
                .layer(Extension(services.assets)),
        )
}
