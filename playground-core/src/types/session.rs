//! Conversation session: a code bound to one correspondent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Correlates a conversation code with the phone number that opened it. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub code: String,
    pub correspondent: String,
    pub created_at: DateTime<Utc>,
}
