use async_trait::async_trait;
use playground_core::{ObjectStorage, StorageError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::info;

use crate::{check_name, join_url};

/// `PUT`s objects to `upload_url/<name>` (optionally with a bearer token) and reports them
/// at `public_base_url/<name>`.
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    http: Client,
    upload_url: String,
    public_base_url: String,
    token: Option<String>,
}

impl HttpObjectStorage {
    pub fn new(upload_url: String, public_base_url: String, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            upload_url,
            public_base_url,
            token,
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        check_name(name)?;
        let target = join_url(&self.upload_url, name);
        let size = bytes.len();
        let mut request = self
            .http
            .put(&target)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let url = join_url(&self.public_base_url, name);
        info!(target = %target, size, url = %url, "Uploaded object");
        Ok(url)
    }
}
