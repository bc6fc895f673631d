//! # broker
//!
//! Long-poll conversation broker over a list-and-send message channel.
//!
//! ## Modules
//!
//! - [`handled`] – consumed message identifiers (exactly-once consumption)
//! - [`sessions`] – conversation code → correspondent registry
//! - [`pictures`] – picture records and overlay selections
//! - [`response`] – typed response decoding and retry prompts
//! - [`conversations`] – session start, typed response collection, sending

pub mod conversations;
pub mod handled;
pub mod pictures;
pub mod response;
pub mod sessions;

pub use conversations::{Conversations, DEFAULT_WAIT_SECONDS};
pub use handled::HandledMessages;
pub use pictures::PictureStore;
pub use response::{
    decode_text, ResponseType, ResponseValue, FLOAT_RETRY_PROMPT, INT_RETRY_PROMPT,
    PICTURE_RETRY_PROMPT,
};
pub use sessions::SessionRegistry;
