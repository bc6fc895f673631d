//! # playground-client
//!
//! Client side of the playground's long-poll protocol. A program opens a [`Conversation`]
//! by keyword, then sends messages and asks typed questions; every wait is a sleep-and-retry
//! loop bounded by a deadline (120 s unless configured).
//!
//! ```no_run
//! # async fn run() -> Result<(), playground_client::ClientError> {
//! use playground_client::PlaygroundClient;
//!
//! let client = PlaygroundClient::new("http://localhost:5000");
//! let conversation = client.start_conversation("I <3 compliments").await?;
//! let name = conversation.get_string("First, what's your name?").await?;
//! conversation.send_message(&format!("Hey, {name} is an awesome name!")).await?;
//! # Ok(())
//! # }
//! ```

mod conversation;
mod error;

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

pub use conversation::{Conversation, Picture};
pub use error::ClientError;

/// How long a single logical wait may last.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Either the awaited payload or the server's advice to ask again later.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Poll<T> {
    Wait { wait_for_seconds: u64 },
    Ready(T),
}

#[derive(Debug, Deserialize)]
struct Started {
    conversation_code: String,
}

#[derive(Debug, Deserialize)]
struct Answer<T> {
    message: T,
}

#[derive(Debug, Deserialize)]
struct PictureAnswer {
    picture_code: String,
}

#[derive(Debug, Deserialize)]
struct Rendered {
    url: String,
}

/// The horizon sent as `messages_must_be_older_than`: replies must arrive after it.
fn horizon_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// HTTP access to a playground server.
#[derive(Debug, Clone)]
pub struct PlaygroundClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl PlaygroundClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-wait deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<reqwest::Response, ClientError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;
        check_status(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ClientError> {
        self.post(path, body)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Repeats `request` until it yields a payload, sleeping as advised between attempts.
    async fn poll<T, F, Fut>(&self, waiting_for: &str, mut request: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Poll<T>, ClientError>>,
    {
        let started = Instant::now();
        loop {
            match request().await? {
                Poll::Ready(value) => return Ok(value),
                Poll::Wait { wait_for_seconds } => {
                    debug!(waiting_for = %waiting_for, wait_for_seconds, "Waiting");
                    tokio::time::sleep(Duration::from_secs(wait_for_seconds)).await;
                    if started.elapsed() >= self.timeout {
                        return Err(ClientError::Timeout {
                            waiting_for: waiting_for.to_string(),
                        });
                    }
                }
            }
        }
    }

    /// Waits for someone to text `keyword` and opens a conversation with them.
    pub async fn start_conversation(&self, keyword: &str) -> Result<Conversation, ClientError> {
        let body = json!({
            "keyword": keyword,
            "messages_must_be_older_than": horizon_now(),
        });
        let started: Started = self
            .poll(&format!("a text with {keyword}"), || {
                self.post_json("/conversation/start", &body)
            })
            .await?;
        Ok(Conversation::new(self.clone(), started.conversation_code))
    }

    pub(crate) async fn send_message(
        &self,
        code: &str,
        message: &str,
        picture_url: Option<&str>,
    ) -> Result<(), ClientError> {
        let body = json!({ "message": message, "picture_url": picture_url });
        self.post(&format!("/conversation/{code}/message/send"), &body)
            .await?;
        Ok(())
    }

    async fn wait_for_response<T: DeserializeOwned>(
        &self,
        code: &str,
        response_type: &str,
    ) -> Result<T, ClientError> {
        let path = format!("/conversation/{code}/message/response/{response_type}");
        let body = json!({ "messages_must_be_older_than": horizon_now() });
        self.poll("a response", || self.post_json(&path, &body)).await
    }

    pub(crate) async fn get_message<T: DeserializeOwned>(
        &self,
        code: &str,
        response_type: &str,
    ) -> Result<T, ClientError> {
        let answer: Answer<T> = self.wait_for_response(code, response_type).await?;
        Ok(answer.message)
    }

    pub(crate) async fn get_picture(&self, code: &str) -> Result<String, ClientError> {
        let answer: PictureAnswer = self.wait_for_response(code, "picture").await?;
        Ok(answer.picture_code)
    }

    pub(crate) async fn add_to_picture(
        &self,
        code: &str,
        picture_code: &str,
        area: &str,
        asset_name: &str,
    ) -> Result<(), ClientError> {
        let mut body = serde_json::Map::new();
        body.insert(format!("{area}_name"), Value::String(asset_name.to_string()));
        self.post(
            &format!("/conversation/{code}/picture/{picture_code}/{area}"),
            &Value::Object(body),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn render_picture(&self, code: &str, picture_code: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/conversation/{code}/picture/{picture_code}/")))
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;
        let rendered: Rendered = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(rendered.url)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
