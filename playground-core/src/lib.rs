//! # playground-core
//!
//! Core types and collaborator traits for the SMS playground broker: inbound/outbound
//! messages, sessions, picture records, the [`MessageTransport`], [`ObjectStorage`] and
//! [`MediaFetcher`] seams, the overlay [`AssetLibrary`], error types and tracing setup.
//! Transport-agnostic; used by the broker, the image pipeline and the server.

pub mod assets;
pub mod error;
pub mod ids;
pub mod logger;
pub mod storage;
pub mod transport;
pub mod types;

pub use assets::AssetLibrary;
pub use error::{PlaygroundError, Result, StorageError, TransportError};
pub use ids::make_unique_id;
pub use logger::init_tracing;
pub use storage::{FetchedMedia, MediaFetcher, ObjectStorage};
pub use transport::{MessageQuery, MessageTransport};
pub use types::{
    parse_timestamp, InboundMessage, OutboundMessage, OverlayArea, OverlayRegion, PictureRecord,
    PollOutcome, ReservedRegion, Session,
};
