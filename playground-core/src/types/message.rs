//! Inbound and outbound message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message received from a correspondent, as listed by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Transport-assigned identifier; the unit of consumption.
    pub id: String,
    /// Sender phone number.
    pub from: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Number of attached media items; fetch them with `MessageTransport::media_urls`.
    pub num_media: u32,
}

impl InboundMessage {
    pub fn has_media(&self) -> bool {
        self.num_media > 0
    }
}

/// A message the broker sends to a correspondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Recipient phone number.
    pub to: String,
    pub body: String,
    pub media_url: Option<String>,
}
