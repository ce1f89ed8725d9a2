use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Where records live.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

/// Where uploaded files are sent.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaConfig {
    S3 {
        bucket: String,
        endpoint: String,
        region: String,
        access_key_id: String,
        secret_access_key: String,
        public_url: String,
    },
    Local {
        root: PathBuf,
        public_url: String,
    },
    Memory,
}

/// Application configuration loaded from environment variables.
/// Secrets have no defaults: a missing credential is a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub store: StoreConfig,
    pub media: MediaConfig,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub upload_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let store = match lookup("STORE_BACKEND").as_deref().unwrap_or("postgres") {
            "postgres" => StoreConfig::Postgres {
                database_url: require("DATABASE_URL")?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            },
            "memory" => StoreConfig::Memory,
            other => bail!("Unknown STORE_BACKEND '{other}' (expected postgres or memory)"),
        };

        let media = match lookup("MEDIA_BACKEND").as_deref().unwrap_or("s3") {
            "s3" => {
                let bucket = require("S3_BUCKET")?;
                let endpoint = require("S3_ENDPOINT")?;
                let public_url = lookup("MEDIA_PUBLIC_URL")
                    .unwrap_or_else(|| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));
                MediaConfig::S3 {
                    region: lookup("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                    access_key_id: require("AWS_ACCESS_KEY_ID")?,
                    secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
                    public_url: public_url.trim_end_matches('/').to_string(),
                    bucket,
                    endpoint,
                }
            }
            "local" => MediaConfig::Local {
                root: PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string())),
                public_url: lookup("MEDIA_PUBLIC_URL")
                    .unwrap_or_else(|| "/uploads".to_string())
                    .trim_end_matches('/')
                    .to_string(),
            },
            "memory" => MediaConfig::Memory,
            other => bail!("Unknown MEDIA_BACKEND '{other}' (expected s3, local or memory)"),
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            store,
            media,
            cors_allowed_origins,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            upload_timeout: Duration::from_secs(parse_or(
                &lookup,
                "UPLOAD_TIMEOUT_SECS",
                DEFAULT_UPLOAD_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
