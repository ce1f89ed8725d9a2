mod applications;
mod blogs;
mod config;
mod db;
mod errors;
mod images;
mod jobs;
mod media;
mod models;
mod routes;
mod state;
mod store;
mod upload;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, MediaConfig, StoreConfig};
use crate::db::LazyPool;
use crate::media::s3::S3Settings;
use crate::media::{LocalMediaStore, MediaStore, MemoryMediaStore, S3MediaStore};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, Store};
use crate::upload::UploadPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Board API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config);
    info!("Record store: {}", store.backend());

    let media = build_media(&config).await?;
    info!("Media backend: {}", media.backend());

    let uploads = UploadPipeline::new(media, config.max_upload_bytes, config.upload_timeout);

    let cors = build_cors(&config.cors_allowed_origins)?;

    let state = AppState {
        store,
        uploads,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The Postgres pool is not opened here; the first request that needs it connects.
fn build_store(config: &Config) -> Arc<dyn Store> {
    match &config.store {
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => Arc::new(PgStore::new(LazyPool::new(database_url, *max_connections))),
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
    }
}

async fn build_media(config: &Config) -> Result<Arc<dyn MediaStore>> {
    let media: Arc<dyn MediaStore> = match &config.media {
        MediaConfig::S3 {
            bucket,
            endpoint,
            region,
            access_key_id,
            secret_access_key,
            public_url,
        } => Arc::new(
            S3MediaStore::connect(S3Settings {
                bucket,
                endpoint,
                region,
                access_key_id,
                secret_access_key,
                public_url,
            })
            .await,
        ),
        MediaConfig::Local { root, public_url } => Arc::new(
            LocalMediaStore::new(root.clone(), public_url)
                .await
                .with_context(|| format!("Failed to create upload dir {}", root.display()))?,
        ),
        MediaConfig::Memory => Arc::new(MemoryMediaStore::new()),
    };
    Ok(media)
}

/// Empty origin list means any origin may call the API.
fn build_cors(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}
