//! Component factory tests: assembling handler state from a config on disk.

mod common;

use std::sync::Arc;

use common::{write_assets, write_cascades, MockTransport};
use playground_server::{
    build_app_state, create_object_storage, BaseConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
use tempfile::TempDir;

fn config(root: &TempDir, backend: StorageBackend) -> ServerConfig {
    let path = |sub: &str| root.path().join(sub).to_string_lossy().into_owned();
    ServerConfig {
        base: BaseConfig {
            account_sid: "ACtest".to_string(),
            auth_token: "secret-token".to_string(),
            phone_number: "+12407536527".to_string(),
            twilio_api_url: "https://api.twilio.com".to_string(),
            log_file: path("logs/test.log"),
        },
        storage: StorageConfig {
            backend,
            local_dir: path("rendered"),
            public_base_url: "http://localhost:5000/rendered".to_string(),
            upload_url: None,
            upload_token: None,
        },
        host: "127.0.0.1".to_string(),
        port: 5000,
        assets_dir: path("images"),
        cascades_dir: path("cascades"),
        render_max_dimension: 640,
        poll_wait_seconds: 2,
    }
}

/// **Test: State builds from cascades and assets on disk**
#[test]
fn test_build_app_state_from_disk() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir_all(root.path().join("cascades")).unwrap();
    write_cascades(&root.path().join("cascades"));
    write_assets(&root.path().join("images"), "walrus");

    let config = config(&root, StorageBackend::Local);
    assert!(config.validate().is_ok());

    let state = build_app_state(&config, Arc::new(MockTransport::default())).unwrap();
    assert!(state.conversations.sessions().is_empty());
    assert!(state.conversations.pictures().is_empty());
}

/// **Test: Missing cascades fail startup**
#[test]
fn test_build_app_state_without_cascades_fails() {
    let root = TempDir::new().unwrap();
    let config = config(&root, StorageBackend::Local);

    let err = build_app_state(&config, Arc::new(MockTransport::default()))
        .err()
        .unwrap();
    assert!(err.to_string().contains("Failed to load cascades"));
}

/// **Test: HTTP storage backend needs an upload URL**
#[test]
fn test_http_storage_requires_upload_url() {
    let root = TempDir::new().unwrap();
    let mut config = config(&root, StorageBackend::Http);
    assert!(create_object_storage(&config).is_err());
    assert!(config.validate().is_err());

    config.storage.upload_url = Some("https://bucket.example.com/upload".to_string());
    assert!(create_object_storage(&config).is_ok());
    assert!(config.validate().is_ok());
}
