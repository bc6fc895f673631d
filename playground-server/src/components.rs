//! Component factory: builds the broker, detector, renderer and collaborators from config.
//! Isolates assembly logic from the runner.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use broker::{Conversations, HandledMessages, PictureStore, SessionRegistry};
use face_overlay::{FaceLandmarkDetector, PictureRenderer};
use object_storage::{HttpMediaFetcher, HttpObjectStorage, LocalObjectStorage};
use playground_core::{AssetLibrary, MessageTransport, ObjectStorage};
use tracing::{info, instrument, warn};
use twilio_client::TwilioClient;

use crate::config::{ServerConfig, StorageBackend};
use crate::state::AppState;

/// Creates the object store renders are uploaded to.
pub fn create_object_storage(config: &ServerConfig) -> Result<Arc<dyn ObjectStorage>> {
    let storage = config.storage();
    match storage.backend {
        StorageBackend::Local => {
            info!(dir = %storage.local_dir, public_base_url = %storage.public_base_url, "Using local object storage");
            Ok(Arc::new(LocalObjectStorage::new(
                &storage.local_dir,
                &storage.public_base_url,
            )))
        }
        StorageBackend::Http => {
            let upload_url = storage
                .upload_url
                .clone()
                .context("STORAGE_UPLOAD_URL is required when STORAGE_BACKEND=http")?;
            info!(upload_url = %upload_url, public_base_url = %storage.public_base_url, "Using HTTP object storage");
            Ok(Arc::new(HttpObjectStorage::new(
                upload_url,
                storage.public_base_url.clone(),
                storage.upload_token.clone(),
            )))
        }
    }
}

/// Builds the shared handler state with the given message transport.
#[instrument(skip(config, transport))]
pub fn build_app_state(
    config: &ServerConfig,
    transport: Arc<dyn MessageTransport>,
) -> Result<AppState> {
    let assets = AssetLibrary::new(&config.assets_dir);
    if !assets.root().is_dir() {
        warn!(dir = %config.assets_dir, "Overlay asset directory does not exist");
    }

    let detector = FaceLandmarkDetector::load_from_dir(Path::new(&config.cascades_dir))
        .with_context(|| format!("Failed to load cascades from {}", config.cascades_dir))?;
    let fetcher = HttpMediaFetcher::new().context("Failed to build media fetcher")?;
    let storage = create_object_storage(config)?;

    let renderer = PictureRenderer::new(Arc::new(detector), assets.clone(), Arc::new(fetcher), storage)
        .with_max_dimension(config.render_max_dimension);

    let conversations = Conversations::new(
        transport,
        Arc::new(HandledMessages::new()),
        Arc::new(SessionRegistry::new()),
        Arc::new(PictureStore::new(assets)),
    )
    .with_wait_seconds(config.poll_wait_seconds);

    Ok(AppState::new(Arc::new(conversations), Arc::new(renderer)))
}

/// Builds the Twilio transport and the shared handler state.
pub fn initialize_app_state(config: &ServerConfig) -> Result<AppState> {
    let base = config.base();
    let transport = TwilioClient::with_api_url(
        base.twilio_api_url.clone(),
        base.account_sid.clone(),
        base.auth_token.clone(),
        base.phone_number.clone(),
    );
    build_app_state(config, Arc::new(transport))
}
