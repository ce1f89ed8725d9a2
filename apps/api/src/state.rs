use std::sync::Arc;

use crate::config::Config;
use crate::store::Store;
use crate::upload::UploadPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Record store backend, chosen by `STORE_BACKEND`.
    pub store: Arc<dyn Store>,
    /// Upload pipeline over the media backend chosen by `MEDIA_BACKEND`.
    pub uploads: UploadPipeline,
    pub config: Config,
}
