//! Core types: messages, sessions, picture records, poll outcomes, timestamps.
//!
//! One file per main type.

mod message;
mod picture;
mod poll;
mod session;
mod timestamp;

pub use message::{InboundMessage, OutboundMessage};
pub use picture::{OverlayArea, OverlayRegion, PictureRecord, ReservedRegion};
pub use poll::PollOutcome;
pub use session::Session;
pub use timestamp::parse_timestamp;
