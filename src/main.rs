use std::{error::Error, sync::Arc};

use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod detection;
mod errors;
mod handlers;
mod storage;

use app::Services;
use config::AppConfig;
use detection::{Detector, SightengineClient};
use handlers::assets::AssetDir;
use storage::ScratchDir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let scratch = ScratchDir::new(config.scratch_dir.clone())?;
    let detector: Arc<dyn Detector> =
        Arc::new(SightengineClient::new(config.sightengine.clone())?);

    let app = app::router(Services {
        detector,
        scratch: Arc::new(scratch),
        assets: Arc::new(AssetDir::new(config.assets_dir.clone())),
        max_upload_bytes: config.max_upload_bytes,
    });

    let addr = config.socket_addr()?;
    tracing::info!("Server running on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
