use std::{env, fmt, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use dotenvy::dotenv;
use thiserror::Error;

const DEFAULT_ENDPOINT: &str = "https://api.sightengine.com/1.0/check.json";
const DEFAULT_MODELS: &str = "genai";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Credentials and endpoint of the external detection service.
#[derive(Clone)]
pub struct SightengineConfig {
    pub api_user: String,
    pub api_secret: String,
    pub endpoint: String,
    pub models: String,
    pub timeout: Duration,
}

impl fmt::Debug for SightengineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SightengineConfig")
            .field("api_user", &self.api_user)
            .field("api_secret", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("models", &self.models)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sightengine: SightengineConfig,
    pub scratch_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Loads `.env` if present, then reads every setting from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| present(key).ok_or(ConfigError::Missing(key));
        let or_default =
            |key: &str, default: &str| present(key).unwrap_or_else(|| default.to_string());

        let sightengine = SightengineConfig {
            api_user: required("SIGHTENGINE_API_USER")?,
            api_secret: required("SIGHTENGINE_API_SECRET")?,
            endpoint: or_default("SIGHTENGINE_ENDPOINT", DEFAULT_ENDPOINT),
            models: or_default("SIGHTENGINE_MODELS", DEFAULT_MODELS),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "DETECT_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        };

        Ok(Self {
            sightengine,
            scratch_dir: PathBuf::from(or_default("SCRATCH_DIR", "./uploads")),
            assets_dir: PathBuf::from(or_default("ASSETS_DIR", "./static")),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            host: or_default("HOST", "0.0.0.0"),
            port: parse_or(&lookup, "PORT", 5000)?,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            key: "HOST",
            value: raw,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
