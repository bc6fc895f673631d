use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::Path;
use tracing::{info, instrument};

use playground_core::init_tracing;

use crate::components::initialize_app_state;
use crate::config::{ServerConfig, StorageBackend};
use crate::http::build_router;

/// Main entry: validate config, init logging, build components, then serve until shutdown.
#[instrument(skip(config))]
pub async fn run_server(config: ServerConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        bind_address = %config.bind_address(),
        phone_number = %config.base().phone_number,
        storage_backend = ?config.storage().backend,
        "Initializing SMS playground"
    );

    let state = initialize_app_state(&config)?;
    let rendered_dir = match config.storage().backend {
        StorageBackend::Local => Some(Path::new(&config.storage().local_dir)),
        StorageBackend::Http => None,
    };
    let app = build_router(state, rendered_dir);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "SMS playground listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("SMS playground stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
