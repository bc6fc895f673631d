//! Error types for cascade loading and picture rendering.

use std::path::PathBuf;

use playground_core::{PlaygroundError, StorageError};
use thiserror::Error;

/// Failure to read or interpret a Haar cascade file.
#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Failed to read cascade {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed cascade XML: {0}")]
    Xml(String),

    #[error("Invalid cascade: {0}")]
    Invalid(String),
}

/// Failure anywhere in the render pipeline. The render is abandoned and nothing is uploaded.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to fetch source picture: {0}")]
    Fetch(#[source] StorageError),

    #[error("Failed to decode source picture: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to load overlay asset {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Overlay asset {0} is not available")]
    MissingAsset(String),

    #[error("Failed to encode rendered picture: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Failed to upload rendered picture: {0}")]
    Upload(#[source] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render task failed: {0}")]
    Task(String),
}

impl From<RenderError> for PlaygroundError {
    fn from(e: RenderError) -> Self {
        PlaygroundError::Render(e.to_string())
    }
}
