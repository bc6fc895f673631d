use std::path::{Path, PathBuf};

use async_trait::async_trait;
use playground_core::{ObjectStorage, StorageError};
use tracing::info;

use crate::{check_name, join_url};

/// Stores objects as files in `dir`; their public URL is `public_base_url/<name>`.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        check_name(name)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        let size = bytes.len();
        tokio::fs::write(&path, bytes).await?;
        let url = join_url(&self.public_base_url, name);
        info!(path = %path.display(), size, content_type = %content_type, url = %url, "Stored object locally");
        Ok(url)
    }
}
