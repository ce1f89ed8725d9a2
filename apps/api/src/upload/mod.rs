//! Upload pipeline: the one path every file takes to the media host.
//!
//! Flow: `check` (content type + size, before anything leaves the process) →
//! `upload` (single attempt, bounded by the configured timeout) → caller
//! persists the returned reference. If that persist fails, the caller hands
//! the reference to `discard` so the object does not linger unlinked.
//!
//! Dropping the `upload` future (client went away) abandons the host call;
//! the record write that would follow it never runs.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::media::{MediaCategory, MediaObject, MediaStore, StoredMedia, UploadError};

pub mod form;

pub use form::UploadForm;

/// Resumes are documents: PDF or Word.
const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// SVG can carry script, and uploads may be served from the API's own origin.
const SCRIPTABLE_IMAGE_TYPES: &[&str] = &["image/svg+xml"];

/// A file as received from a multipart request, held in memory.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Which declared content types a caller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePolicy {
    Document,
    Image,
}

impl FilePolicy {
    pub fn allows(self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match self {
            FilePolicy::Document => DOCUMENT_TYPES.contains(&essence.as_str()),
            FilePolicy::Image => {
                essence.starts_with("image/")
                    && essence.len() > "image/".len()
                    && !SCRIPTABLE_IMAGE_TYPES.contains(&essence.as_str())
            }
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FilePolicy::Document => "a PDF or Word document",
            FilePolicy::Image => "an image",
        }
    }
}

#[derive(Clone)]
pub struct UploadPipeline {
    media: Arc<dyn MediaStore>,
    max_bytes: usize,
    timeout: Duration,
}

impl UploadPipeline {
    pub fn new(media: Arc<dyn MediaStore>, max_bytes: usize, timeout: Duration) -> Self {
        Self {
            media,
            max_bytes,
            timeout,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.media.backend()
    }

    /// Rejects files the caller's policy does not accept, before any upload.
    pub fn check(&self, file: &FileUpload, policy: FilePolicy) -> Result<(), AppError> {
        if file.data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if file.data.len() > self.max_bytes {
            return Err(AppError::Validation(format!(
                "Uploaded file is {} bytes; the limit is {} bytes",
                file.data.len(),
                self.max_bytes
            )));
        }
        match file.content_type.as_deref() {
            Some(content_type) if policy.allows(content_type) => Ok(()),
            Some(content_type) => Err(AppError::Validation(format!(
                "Uploaded file must be {}, got {content_type}",
                policy.describe()
            ))),
            None => Err(AppError::Validation(format!(
                "Uploaded file must be {} (no content type given)",
                policy.describe()
            ))),
        }
    }

    /// Sends the file to the media host and returns its reference.
    pub async fn upload(
        &self,
        file: FileUpload,
        category: MediaCategory,
    ) -> Result<StoredMedia, UploadError> {
        let size = file.data.len();
        let object = MediaObject {
            category,
            file_name: file.file_name,
            content_type: file.content_type,
            data: file.data,
        };

        let stored = tokio::time::timeout(self.timeout, self.media.store(object))
            .await
            .map_err(|_| UploadError::Timeout(self.timeout))??;

        info!(
            category = category.folder(),
            public_id = %stored.public_id,
            size,
            "Upload stored"
        );
        Ok(stored)
    }

    /// Best-effort removal of an object whose owning record was never written.
    pub async fn discard(&self, stored: &StoredMedia) {
        match tokio::time::timeout(self.timeout, self.media.remove(&stored.public_id)).await {
            Ok(Ok(())) => warn!(public_id = %stored.public_id, "Reaped orphaned upload"),
            Ok(Err(e)) => warn!(
                public_id = %stored.public_id,
                url = %stored.url,
                "Failed to reap orphaned upload: {e}"
            ),
            Err(_) => warn!(
                public_id = %stored.public_id,
                url = %stored.url,
                "Timed out reaping orphaned upload"
            ),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FailingMediaStore, StalledMediaStore};
    use super::*;
    use crate::media::MemoryMediaStore;

    fn pipeline(media: Arc<dyn MediaStore>) -> UploadPipeline {
        UploadPipeline::new(media, 16, Duration::from_secs(5))
    }

    fn file(content_type: Option<&str>, data: &'static [u8]) -> FileUpload {
        FileUpload {
            file_name: Some("upload.bin".to_string()),
            content_type: content_type.map(String::from),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_document_policy_accepts_pdf_and_word_only() {
        assert!(FilePolicy::Document.allows("application/pdf"));
        assert!(FilePolicy::Document.allows("Application/PDF; charset=binary"));
        assert!(FilePolicy::Document.allows(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ));
        assert!(!FilePolicy::Document.allows("image/png"));
        assert!(!FilePolicy::Document.allows("application/octet-stream"));
    }

    #[test]
    fn test_image_policy_requires_image_subtype() {
        assert!(FilePolicy::Image.allows("image/png"));
        assert!(FilePolicy::Image.allows("image/jpeg"));
        assert!(!FilePolicy::Image.allows("image/"));
        assert!(!FilePolicy::Image.allows("image/svg+xml"));
        assert!(!FilePolicy::Image.allows("Image/SVG+XML; charset=utf-8"));
        assert!(!FilePolicy::Image.allows("application/pdf"));
    }

    #[test]
    fn test_check_rejects_empty_oversize_and_untyped() {
        let p = pipeline(Arc::new(MemoryMediaStore::new()));
        assert!(p.check(&file(Some("image/png"), b"png"), FilePolicy::Image).is_ok());
        assert!(matches!(
            p.check(&file(Some("image/png"), b""), FilePolicy::Image),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            p.check(
                &file(Some("image/png"), b"this is far more than sixteen bytes"),
                FilePolicy::Image
            ),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            p.check(&file(None, b"png"), FilePolicy::Image),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_returns_reference_and_keeps_bytes() {
        let media = Arc::new(MemoryMediaStore::new());
        let p = pipeline(media.clone());

        let stored = p
            .upload(file(Some("image/png"), b"png"), MediaCategory::Images)
            .await
            .unwrap();

        assert!(stored.public_id.starts_with("images/"));
        assert_eq!(stored.url, format!("memory://{}", stored.public_id));
        assert_eq!(
            media.get(&stored.public_id).await.as_deref(),
            Some(&b"png"[..])
        );
    }

    #[tokio::test]
    async fn test_upload_surfaces_host_error_without_retry() {
        let media = Arc::new(FailingMediaStore::default());
        let p = pipeline(media.clone());

        let err = p
            .upload(file(Some("application/pdf"), b"%PDF"), MediaCategory::Resumes)
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Rejected(ref m) if m == "quota exceeded"));
        assert_eq!(media.attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_times_out() {
        let p = UploadPipeline::new(Arc::new(StalledMediaStore), 16, Duration::from_secs(30));
        let err = p
            .upload(file(Some("image/png"), b"png"), MediaCategory::Images)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Timeout(d) if d == Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_discard_removes_object() {
        let media = Arc::new(MemoryMediaStore::new());
        let p = pipeline(media.clone());
        let stored = p
            .upload(file(Some("image/png"), b"png"), MediaCategory::BlogCovers)
            .await
            .unwrap();

        p.discard(&stored).await;
        assert_eq!(media.len().await, 0);
    }
}
