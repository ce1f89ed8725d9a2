//! Media host: where uploaded files end up.
//!
//! One capability, three backends, chosen by `MEDIA_BACKEND`:
//! - `S3MediaStore`: S3-compatible object storage (AWS or MinIO).
//! - `LocalMediaStore`: files under `UPLOAD_DIR`, served at `/uploads`.
//! - `MemoryMediaStore`: process-local, for development and tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub mod local;
pub mod memory;
pub mod s3;

pub use local::LocalMediaStore;
pub use memory::MemoryMediaStore;
pub use s3::S3MediaStore;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("S3 {operation} failed")]
    S3 {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("media host did not answer within {0:?}")]
    Timeout(Duration),

    #[error("media host rejected the file: {0}")]
    Rejected(String),
}

impl UploadError {
    /// An object-store call failed; `operation` names the call and its key.
    pub fn s3(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        UploadError::S3 {
            operation: operation.into(),
            source: Box::new(source),
        }
    }
}

/// Folder a file is filed under on the media host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Resumes,
    BlogCovers,
    Images,
}

impl MediaCategory {
    pub fn folder(self) -> &'static str {
        match self {
            MediaCategory::Resumes => "resumes",
            MediaCategory::BlogCovers => "blogs",
            MediaCategory::Images => "images",
        }
    }
}

/// A file on its way to the media host. `data` is shared, never copied.
#[derive(Debug, Clone)]
pub struct MediaObject {
    pub category: MediaCategory,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl MediaObject {
    /// `<folder>/<unix-millis>-<uuid>-<file name>`
    pub fn object_key(&self) -> String {
        let name = self
            .file_name
            .as_deref()
            .map(sanitize_file_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "file".to_string());
        format!(
            "{}/{}-{}-{}",
            self.category.folder(),
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            name
        )
    }
}

/// The media host's acknowledgement: a durable URL plus its own identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
}

/// Storage backend for uploaded files.
#[async_trait]
pub trait MediaStore: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Stores the object in a single attempt and returns its reference.
    async fn store(&self, object: MediaObject) -> Result<StoredMedia, UploadError>;

    /// Removes a previously stored object by its `public_id`.
    async fn remove(&self, public_id: &str) -> Result<(), UploadError>;
}

/// Keeps `[A-Za-z0-9._-]`, replaces everything else with `_`, and drops any
/// leading dots so a name can never climb out of its folder.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// Joins a public base URL and an object key with exactly one slash.
pub(crate) fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}
