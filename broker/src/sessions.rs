//! Registry mapping conversation codes to the correspondent that opened them.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use playground_core::{make_unique_id, Session};
use tracing::info;

/// Conversation code → [`Session`]. Sessions live for the life of the process.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh code and binds it to `correspondent`. The vacant-entry insert makes
    /// check-and-bind atomic; a colliding code is simply redrawn.
    pub fn open(&self, correspondent: &str) -> Session {
        loop {
            let code = make_unique_id();
            if let Entry::Vacant(slot) = self.sessions.entry(code.clone()) {
                let session = Session {
                    code,
                    correspondent: correspondent.to_string(),
                    created_at: Utc::now(),
                };
                slot.insert(session.clone());
                info!(
                    conversation_code = %session.code,
                    correspondent = %session.correspondent,
                    "Session opened"
                );
                return session;
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<Session> {
        self.sessions.get(code).map(|s| s.value().clone())
    }

    /// Phone number bound to `code`, if the session exists.
    pub fn correspondent(&self, code: &str) -> Option<String> {
        self.sessions.get(code).map(|s| s.correspondent.clone())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.sessions.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
