#![allow(dead_code)]

//! In-memory [`MessageTransport`] for broker tests.
//!
//! Holds a scripted inbox, records every outbound message, and lists newest first the way
//! SMS providers do so tests exercise the broker's own ordering.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use playground_core::{
    InboundMessage, MessageQuery, MessageTransport, OutboundMessage, TransportError,
};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 5, 4, 12, 0, 0).unwrap()
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(seconds)
}

pub fn inbound(id: &str, from: &str, body: &str, seconds: i64) -> InboundMessage {
    InboundMessage {
        id: id.to_string(),
        from: from.to_string(),
        body: body.to_string(),
        created_at: at(seconds),
        num_media: 0,
    }
}

#[derive(Default)]
pub struct MockTransport {
    inbox: Mutex<Vec<InboundMessage>>,
    media: Mutex<HashMap<String, Vec<String>>>,
    sent: Mutex<Vec<OutboundMessage>>,
    fail_sends: bool,
    fail_media: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose `send_message` always fails.
    pub fn failing_sends() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    /// A transport whose `media_urls` always fails.
    pub fn failing_media() -> Self {
        Self {
            fail_media: true,
            ..Self::default()
        }
    }

    pub fn push(&self, message: InboundMessage) {
        self.inbox.lock().unwrap().push(message);
    }

    pub fn push_with_media(&self, mut message: InboundMessage, urls: &[&str]) {
        message.num_media = urls.len() as u32;
        self.media
            .lock()
            .unwrap()
            .insert(message.id.clone(), urls.iter().map(|u| u.to_string()).collect());
        self.push(message);
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<InboundMessage>, TransportError> {
        let mut listed: Vec<InboundMessage> = self
            .inbox
            .lock()
            .unwrap()
            .iter()
            .filter(|m| query.from.as_deref().map_or(true, |from| m.from == from))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn media_urls(&self, message_id: &str) -> Result<Vec<String>, TransportError> {
        if self.fail_media {
            return Err(TransportError::Http("timeout".into()));
        }
        Ok(self
            .media
            .lock()
            .unwrap()
            .get(message_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Http("connection refused".into()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
