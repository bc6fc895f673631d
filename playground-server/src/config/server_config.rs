//! ServerConfig: BaseConfig + StorageConfig + HTTP and rendering settings. Use load() for
//! env-based loading.

use anyhow::Result;
use std::env;
use std::net::IpAddr;

use face_overlay::renderer::DEFAULT_MAX_DIMENSION;

use super::{BaseConfig, StorageConfig};

pub struct ServerConfig {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    /// PLAYGROUND_HOST
    pub host: String,
    /// PLAYGROUND_PORT
    pub port: u16,
    /// ASSETS_DIR; holds `moustaches/` and `glasses/`
    pub assets_dir: String,
    /// CASCADES_DIR; holds the face, nose and eye cascade XML files
    pub cascades_dir: String,
    /// RENDER_MAX_DIMENSION
    pub render_max_dimension: u32,
    /// POLL_WAIT_SECONDS; advisory delay sent with every wait answer
    pub poll_wait_seconds: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    /// Load full config from environment variables. `port` overrides PLAYGROUND_PORT if
    /// provided. Call validate() after load to check config before init.
    pub fn load(port: Option<u16>) -> Result<Self> {
        let base = BaseConfig::load()?;
        let storage = StorageConfig::load()?;
        let host = env::var("PLAYGROUND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = port.unwrap_or_else(|| env_or("PLAYGROUND_PORT", 5000));
        let assets_dir = env::var("ASSETS_DIR").unwrap_or_else(|_| "images".to_string());
        let cascades_dir = env::var("CASCADES_DIR").unwrap_or_else(|_| "cascades".to_string());
        let render_max_dimension = env_or("RENDER_MAX_DIMENSION", DEFAULT_MAX_DIMENSION);
        let poll_wait_seconds = env_or("POLL_WAIT_SECONDS", 1);

        Ok(Self {
            base,
            storage,
            host,
            port,
            assets_dir,
            cascades_dir,
            render_max_dimension,
            poll_wait_seconds,
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.storage.validate()?;
        if self.host.parse::<IpAddr>().is_err() {
            anyhow::bail!("PLAYGROUND_HOST is not an IP address: {}", self.host);
        }
        if self.render_max_dimension == 0 {
            anyhow::bail!("RENDER_MAX_DIMENSION must be positive");
        }
        Ok(())
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
