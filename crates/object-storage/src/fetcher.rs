use async_trait::async_trait;
use playground_core::{FetchedMedia, MediaFetcher, StorageError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

/// Some media hosts refuse requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Downloads media over HTTP(S), following redirects.
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    http: Client,
}

impl HttpMediaFetcher {
    pub fn new() -> Result<Self, StorageError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StorageError::Http(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, StorageError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StorageError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Http(format!("GET {url} returned {status}")));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Http(e.to_string()))?
            .to_vec();
        debug!(url = %url, size = bytes.len(), content_type = ?content_type, "Fetched media");
        Ok(FetchedMedia {
            bytes,
            content_type,
        })
    }
}
