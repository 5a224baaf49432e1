use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::modules::storage::ObjectStorage;

const BASE_URL: &str = "memory://catalog-images/";

/// A stored object
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-process object storage (development mode and tests)
#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStorage {
    pub async fn get(&self, url: &str) -> Option<StoredObject> {
        let key = url.strip_prefix(BASE_URL)?;
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put_public(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        let key = path.trim_start_matches('/').to_string();
        self.objects.write().await.insert(
            key.clone(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("{}{}", BASE_URL, key))
    }

    async fn delete_by_url(&self, url: &str) -> Result<()> {
        if let Some(key) = url.strip_prefix(BASE_URL) {
            if let Some(removed) = self.objects.write().await.remove(key) {
                tracing::debug!(
                    "Deleted in-memory object {} ({}, {} bytes)",
                    key,
                    removed.content_type,
                    removed.data.len()
                );
            }
        }
        Ok(())
    }
}
