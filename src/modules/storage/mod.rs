//! Storage module for image uploads
//!
//! Provides the [`ObjectStorage`] upload boundary with a MinIO/S3-compatible
//! implementation and an in-process one for development and tests.

mod memory;
mod minio_client;

use async_trait::async_trait;

use crate::core::error::Result;

pub use memory::MemoryStorage;
pub use minio_client::MinIOClient;

/// Upload boundary: stores raw files and hands back a public URL
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a publicly readable object under `path` and return its URL
    async fn put_public(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    /// Delete an object by the URL returned from [`ObjectStorage::put_public`].
    /// URLs that do not belong to this storage are ignored.
    async fn delete_by_url(&self, url: &str) -> Result<()>;
}
