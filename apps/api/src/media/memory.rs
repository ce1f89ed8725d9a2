use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::media::{MediaObject, MediaStore, StoredMedia, UploadError};

/// Keeps uploads in a map. References look like `memory://<key>`.
#[derive(Default)]
pub struct MemoryMediaStore {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn get(&self, public_id: &str) -> Option<Bytes> {
        self.objects.read().await.get(public_id).cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn store(&self, object: MediaObject) -> Result<StoredMedia, UploadError> {
        let key = object.object_key();
        self.objects.write().await.insert(key.clone(), object.data);
        Ok(StoredMedia {
            url: format!("memory://{key}"),
            public_id: key,
        })
    }

    async fn remove(&self, public_id: &str) -> Result<(), UploadError> {
        self.objects.write().await.remove(public_id);
        Ok(())
    }
}
