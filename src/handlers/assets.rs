//! Front-end files served from a fixed set of names.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Extension,
    body::Bytes,
    response::{IntoResponse, Response},
};
use headers::{CacheControl, ContentType, HeaderMapExt};
use mime::Mime;

use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Index,
    Script,
    Style,
}

impl Asset {
    pub fn file_name(self) -> &'static str {
        match self {
            Asset::Index => "index.html",
            Asset::Script => "script.js",
            Asset::Style => "style.css",
        }
    }

    pub fn mime(self) -> Mime {
        match self {
            Asset::Index => mime::TEXT_HTML_UTF_8,
            Asset::Script => mime::APPLICATION_JAVASCRIPT_UTF_8,
            Asset::Style => mime::TEXT_CSS_UTF_8,
        }
    }
}

#[derive(Debug)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: PathBuf) -> Self {
        if !root.is_dir() {
            tracing::warn!(path = %root.display(), "asset directory does not exist");
        }
        Self { root }
    }

    async fn load(&self, asset: Asset) -> Result<Bytes, ApiError> {
        match tokio::fs::read(self.root.join(asset.file_name())).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ApiError::NotFound),
            Err(e) => Err(ApiError::Io(e)),
        }
    }
}

async fn serve(assets: &AssetDir, asset: Asset) -> Result<Response, ApiError> {
    let bytes = assets.load(asset).await?;

    let mut response = bytes.into_response();
    let headers = response.headers_mut();
    headers.typed_insert(ContentType::from(asset.mime()));
    headers.typed_insert(CacheControl::new().with_no_cache());

    Ok(response)
}

pub async fn index(Extension(assets): Extension<Arc<AssetDir>>) -> Result<Response, ApiError> {
    serve(&assets, Asset::Index).await
}

pub async fn script(Extension(assets): Extension<Arc<AssetDir>>) -> Result<Response, ApiError> {
    serve(&assets, Asset::Script).await
}

pub async fn style(Extension(assets): Extension<Arc<AssetDir>>) -> Result<Response, ApiError> {
    serve(&assets, Asset::Style).await
}
