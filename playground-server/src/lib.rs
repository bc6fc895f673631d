//! # playground-server
//!
//! HTTP front of the SMS playground: wires the Twilio transport, the conversation broker,
//! the picture renderer and object storage. Loads config from env and serves the API.

pub mod cli;
pub mod components;
pub mod config;
pub mod http;
pub mod runner;
pub mod state;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_app_state, create_object_storage, initialize_app_state};
pub use config::{BaseConfig, ServerConfig, StorageBackend, StorageConfig};
pub use http::{build_router, ApiError};
pub use runner::run_server;
pub use state::AppState;
