//! Where rendered pictures are published.

use anyhow::Result;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Files in a local directory, served by this server under `/rendered`.
    Local,
    /// `PUT` to an external bucket endpoint.
    Http,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "http" => Ok(StorageBackend::Http),
            other => anyhow::bail!("STORAGE_BACKEND must be `local` or `http`, got `{}`", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// STORAGE_BACKEND
    pub backend: StorageBackend,
    /// STORAGE_LOCAL_DIR
    pub local_dir: String,
    /// STORAGE_PUBLIC_BASE_URL; prefix of every returned render URL
    pub public_base_url: String,
    /// STORAGE_UPLOAD_URL (http backend)
    pub upload_url: Option<String>,
    /// STORAGE_UPLOAD_TOKEN (http backend, optional bearer token)
    pub upload_token: Option<String>,
}

impl StorageConfig {
    pub fn load() -> Result<Self> {
        let backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::Local,
        };
        let local_dir = env::var("STORAGE_LOCAL_DIR").unwrap_or_else(|_| "rendered".to_string());
        let public_base_url = env::var("STORAGE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000/rendered".to_string());
        let upload_url = env::var("STORAGE_UPLOAD_URL").ok().filter(|s| !s.is_empty());
        let upload_token = env::var("STORAGE_UPLOAD_TOKEN").ok().filter(|s| !s.is_empty());

        Ok(Self {
            backend,
            local_dir,
            public_base_url,
            upload_url,
            upload_token,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.public_base_url).is_err() {
            anyhow::bail!(
                "STORAGE_PUBLIC_BASE_URL is not a valid URL: {}",
                self.public_base_url
            );
        }
        if self.backend == StorageBackend::Http {
            let Some(ref upload_url) = self.upload_url else {
                anyhow::bail!("STORAGE_UPLOAD_URL is required when STORAGE_BACKEND=http");
            };
            if reqwest::Url::parse(upload_url).is_err() {
                anyhow::bail!("STORAGE_UPLOAD_URL is not a valid URL: {}", upload_url);
            }
        }
        Ok(())
    }
}
