//! Object storage and media fetching seams used by the picture renderer.

use async_trait::async_trait;

use crate::error::StorageError;

/// Raw bytes of a downloaded media item plus its declared content type.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Downloads media referenced by URL (pictures sent by correspondents).
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, StorageError>;
}

/// Accepts a named blob upload and returns a stable public URL for it.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError>;
}
