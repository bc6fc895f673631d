//! Twilio REST payloads (only the fields the broker reads).

use chrono::{DateTime, Utc};
use playground_core::{InboundMessage, TransportError};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub(crate) struct MessageList {
    #[serde(default)]
    pub messages: Vec<MessageResource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageResource {
    pub sid: String,
    pub from: String,
    #[serde(default)]
    pub body: Option<String>,
    pub direction: String,
    pub date_created: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub num_media: u32,
}

impl MessageResource {
    pub fn is_inbound(&self) -> bool {
        self.direction == "inbound"
    }

    pub fn into_inbound(self) -> Result<InboundMessage, TransportError> {
        let created_at = DateTime::parse_from_rfc2822(&self.date_created)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                TransportError::Decode(format!(
                    "message {} has bad date_created {:?}: {e}",
                    self.sid, self.date_created
                ))
            })?;
        Ok(InboundMessage {
            id: self.sid,
            from: self.from,
            body: self.body.unwrap_or_default(),
            created_at,
            num_media: self.num_media,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaList {
    #[serde(default)]
    pub media_list: Vec<MediaResource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaResource {
    pub uri: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

/// Twilio sends counts as strings (`"num_media": "1"`); accept numbers too.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
        Missing(Option<()>),
    }
    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Count::Missing(_) => Ok(0),
    }
}
