//! Shared handler state.

use std::sync::Arc;

use broker::Conversations;
use face_overlay::PictureRenderer;
use playground_core::{PictureRecord, PlaygroundError, Result};

/// Everything a request handler needs; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub conversations: Arc<Conversations>,
    pub renderer: Arc<PictureRenderer>,
}

impl AppState {
    pub fn new(conversations: Arc<Conversations>, renderer: Arc<PictureRenderer>) -> Self {
        Self {
            conversations,
            renderer,
        }
    }

    pub fn require_session(&self, code: &str) -> Result<()> {
        if self.conversations.sessions().contains(code) {
            Ok(())
        } else {
            Err(PlaygroundError::UnknownSession(code.to_string()))
        }
    }

    /// Snapshot of picture `picture_code`, reachable only through a live conversation.
    pub fn require_picture(&self, code: &str, picture_code: &str) -> Result<PictureRecord> {
        self.require_session(code)?;
        self.conversations
            .pictures()
            .get(picture_code)
            .ok_or_else(|| PlaygroundError::UnknownPicture(picture_code.to_string()))
    }
}
