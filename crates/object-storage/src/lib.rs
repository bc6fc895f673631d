//! # object-storage
//!
//! [`ObjectStorage`] and [`MediaFetcher`] implementations used by the picture renderer.
//! [`LocalObjectStorage`] writes into a directory the server publishes itself;
//! [`HttpObjectStorage`] `PUT`s into an external bucket endpoint; [`HttpMediaFetcher`]
//! downloads correspondents' media.

mod fetcher;
mod http;
mod local;

pub use fetcher::HttpMediaFetcher;
pub use http::HttpObjectStorage;
pub use local::LocalObjectStorage;

pub(crate) fn join_url(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name)
}

/// Object names are flat file names.
pub(crate) fn check_name(name: &str) -> Result<(), playground_core::StorageError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(playground_core::StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid object name {name:?}"),
        )));
    }
    Ok(())
}
