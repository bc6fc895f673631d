//! Request and response bodies.

use broker::ResponseValue;
use playground_core::PollOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub keyword: String,
    pub messages_must_be_older_than: String,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub message: String,
    #[serde(default)]
    pub picture_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseRequest {
    pub messages_must_be_older_than: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum StartReply {
    Started { conversation_code: String },
    Wait { wait_for_seconds: u64 },
}

impl From<PollOutcome<playground_core::Session>> for StartReply {
    fn from(outcome: PollOutcome<playground_core::Session>) -> Self {
        match outcome {
            PollOutcome::Ready(session) => StartReply::Started {
                conversation_code: session.code,
            },
            PollOutcome::Wait { seconds } => StartReply::Wait {
                wait_for_seconds: seconds,
            },
        }
    }
}

/// JSON value of a `{message}` reply; the number variants serialise as JSON numbers.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MessageValue {
    Text(String),
    Int(i64),
    Float(f64),
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ResponseReply {
    Message { message: MessageValue },
    Picture { picture_code: String },
    Wait { wait_for_seconds: u64 },
}

impl From<PollOutcome<ResponseValue>> for ResponseReply {
    fn from(outcome: PollOutcome<ResponseValue>) -> Self {
        let value = match outcome {
            PollOutcome::Ready(value) => value,
            PollOutcome::Wait { seconds } => {
                return ResponseReply::Wait {
                    wait_for_seconds: seconds,
                }
            }
        };
        let message = match value {
            ResponseValue::Text(text) => MessageValue::Text(text),
            ResponseValue::Int(n) => MessageValue::Int(n),
            ResponseValue::Float(x) => MessageValue::Float(x),
            ResponseValue::Picture(picture_code) => {
                return ResponseReply::Picture { picture_code }
            }
        };
        ResponseReply::Message { message }
    }
}

#[derive(Debug, Serialize)]
pub struct RenderedPicture {
    pub url: String,
}
