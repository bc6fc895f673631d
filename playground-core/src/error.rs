//! Error types for the broker core.
//!
//! [`PlaygroundError`] is the top-level error surfaced to the HTTP layer; [`TransportError`]
//! and [`StorageError`] are produced by the external collaborators.

use thiserror::Error;

/// Top-level error for the playground (client input, collaborators, rendering, config).
#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("No conversation found with code {0}")]
    UnknownSession(String),

    #[error("No picture found with code {0}")]
    UnknownPicture(String),

    #[error("There isn't a {region} with the name {name}")]
    AssetNotFound { region: String, name: String },

    #[error("Area {0} is not supported")]
    UnsupportedArea(String),

    #[error("Response type {0} is not supported")]
    UnsupportedResponseType(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlaygroundError {
    /// True for errors caused by the caller's input (unknown codes, areas, assets); these
    /// are reported as "not found" and never affect broker state.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PlaygroundError::UnknownSession(_)
                | PlaygroundError::UnknownPicture(_)
                | PlaygroundError::AssetNotFound { .. }
                | PlaygroundError::UnsupportedArea(_)
                | PlaygroundError::UnsupportedResponseType(_)
        )
    }
}

/// Errors produced by a [`crate::MessageTransport`] (HTTP failure, API error, bad payload).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Errors produced by object storage and media fetching.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations; uses [`PlaygroundError`].
pub type Result<T> = std::result::Result<T, PlaygroundError>;
