use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::media::{public_url, MediaObject, MediaStore, StoredMedia, UploadError};

/// Writes uploads under a root directory that the router serves at `/uploads`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_url: String,
}

impl LocalMediaStore {
    /// Creates the root directory if it is missing.
    pub async fn new(root: impl Into<PathBuf>, public_url: &str) -> Result<Self, UploadError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            public_url: public_url.to_string(),
        })
    }

    #[cfg(test)]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_start_matches('/'))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn store(&self, object: MediaObject) -> Result<StoredMedia, UploadError> {
        let key = object.object_key();
        let path = self.resolve(&key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, &object.data).await?;
        info!("Wrote {} bytes to {}", object.data.len(), path.display());

        Ok(StoredMedia {
            url: public_url(&self.public_url, &key),
            public_id: key,
        })
    }

    async fn remove(&self, public_id: &str) -> Result<(), UploadError> {
        if public_id.split('/').any(|segment| segment == "..") {
            return Err(UploadError::Rejected(format!(
                "refusing to remove {public_id}"
            )));
        }
        let path = self.resolve(public_id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} already gone", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaCategory;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_store_writes_file_under_category() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/uploads").await.unwrap();

        let stored = store
            .store(MediaObject {
                category: MediaCategory::BlogCovers,
                file_name: Some("cover.png".to_string()),
                content_type: Some("image/png".to_string()),
                data: Bytes::from_static(b"\x89PNG"),
            })
            .await
            .unwrap();

        assert!(stored.public_id.starts_with("blogs/"));
        assert_eq!(stored.url, format!("/uploads/{}", stored.public_id));
        let written = std::fs::read(store.root().join(&stored.public_id)).unwrap();
        assert_eq!(written, b"\x89PNG");
    }

    #[tokio::test]
    async fn test_remove_deletes_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/uploads").await.unwrap();
        let stored = store
            .store(MediaObject {
                category: MediaCategory::Images,
                file_name: Some("a.jpg".to_string()),
                content_type: Some("image/jpeg".to_string()),
                data: Bytes::from_static(b"jpeg"),
            })
            .await
            .unwrap();

        store.remove(&stored.public_id).await.unwrap();
        assert!(!store.root().join(&stored.public_id).exists());
        store.remove(&stored.public_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_refuses_parent_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/uploads").await.unwrap();
        assert!(matches!(
            store.remove("../outside.txt").await,
            Err(UploadError::Rejected(_))
        ));
    }
}
