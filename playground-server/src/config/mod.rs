//! Server configuration: BaseConfig (Twilio + log) + ServerConfig (HTTP, assets, storage, rendering).

mod base;
mod server_config;
mod storage;


pub use base::BaseConfig;
pub use server_config::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};
