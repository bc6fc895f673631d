//! The message channel seam: list recent inbound messages, send outbound ones.
//!
//! The channel has no push mechanism; the broker polls it on every long-poll request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::TransportError;
use crate::types::{InboundMessage, OutboundMessage};

/// Filter for [`MessageTransport::list_messages`]. Implementations may over-return; the
/// broker re-applies every filter itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    /// Only messages sent by this phone number.
    pub from: Option<String>,
    /// Only messages sent on or after this instant (implementations may round down to the day).
    pub sent_after: Option<DateTime<Utc>>,
}

impl MessageQuery {
    pub fn sent_after(instant: DateTime<Utc>) -> Self {
        Self {
            from: None,
            sent_after: Some(instant),
        }
    }

    pub fn from_correspondent(phone: &str, instant: DateTime<Utc>) -> Self {
        Self {
            from: Some(phone.to_string()),
            sent_after: Some(instant),
        }
    }
}

/// Message channel keyed by phone identity (e.g. an SMS provider account).
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Lists recent inbound messages matching `query`, in any order.
    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<InboundMessage>, TransportError>;

    /// Returns the public URLs of the media attached to an inbound message.
    async fn media_urls(&self, message_id: &str) -> Result<Vec<String>, TransportError>;

    /// Sends a message (optionally carrying a picture) to a correspondent.
    async fn send_message(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}
