//! Conversation correlation over a poll-only message channel.
//!
//! Every request lists the channel, skips messages older than the caller's horizon or
//! already handled, and claims at most one message. A claimed message is consumed for good
//! even when its content turns out to be unusable; the caller just polls again.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use playground_core::{
    InboundMessage, MessageQuery, MessageTransport, OutboundMessage, PlaygroundError, PollOutcome,
    Result, Session,
};
use tracing::{debug, info, instrument, warn};

use crate::handled::HandledMessages;
use crate::pictures::PictureStore;
use crate::response::{decode_text, ResponseType, ResponseValue, PICTURE_RETRY_PROMPT};
use crate::sessions::SessionRegistry;

/// Advisory delay returned with every `WAIT`.
pub const DEFAULT_WAIT_SECONDS: u64 = 1;

/// Session start, typed response collection and sending, sharing one consumed-message set.
pub struct Conversations {
    transport: Arc<dyn MessageTransport>,
    handled: Arc<HandledMessages>,
    sessions: Arc<SessionRegistry>,
    pictures: Arc<PictureStore>,
    wait_seconds: u64,
}

impl Conversations {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        handled: Arc<HandledMessages>,
        sessions: Arc<SessionRegistry>,
        pictures: Arc<PictureStore>,
    ) -> Self {
        Self {
            transport,
            handled,
            sessions,
            pictures,
            wait_seconds: DEFAULT_WAIT_SECONDS,
        }
    }

    /// Overrides the advisory delay sent with `WAIT` answers.
    pub fn with_wait_seconds(mut self, wait_seconds: u64) -> Self {
        self.wait_seconds = wait_seconds;
        self
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn pictures(&self) -> &PictureStore {
        &self.pictures
    }

    pub fn handled(&self) -> &HandledMessages {
        &self.handled
    }

    fn wait<T>(&self) -> PollOutcome<T> {
        PollOutcome::Wait {
            seconds: self.wait_seconds,
        }
    }

    /// Unconsumed messages at or after `not_before`, oldest first.
    fn pending(&self, mut messages: Vec<InboundMessage>, not_before: DateTime<Utc>) -> Vec<InboundMessage> {
        messages.retain(|m| m.created_at >= not_before && !self.handled.contains(&m.id));
        messages.sort_by_key(|m| m.created_at);
        messages
    }

    /// Opens a session for the first unconsumed message whose trimmed, case-folded body equals
    /// the trimmed, case-folded `keyword`.
    ///
    /// Every message inspected on the way is consumed, matching or not: a message seen while
    /// waiting for one keyword can never start a different conversation later.
    #[instrument(skip(self))]
    pub async fn start_session(
        &self,
        keyword: &str,
        not_before: DateTime<Utc>,
    ) -> Result<PollOutcome<Session>> {
        let wanted = keyword.trim().to_lowercase();
        let messages = self
            .transport
            .list_messages(&MessageQuery::sent_after(not_before))
            .await?;

        for message in self.pending(messages, not_before) {
            if !self.handled.mark(&message.id) {
                continue;
            }
            if message.body.trim().to_lowercase() != wanted {
                debug!(message_id = %message.id, keyword = %keyword, "Message does not match keyword, consumed");
                continue;
            }

            let session = self.sessions.open(&message.from);
            info!(
                correspondent = %session.correspondent,
                keyword = %keyword,
                conversation_code = %session.code,
                "Created conversation via keyword"
            );
            return Ok(PollOutcome::Ready(session));
        }

        Ok(self.wait())
    }

    /// Sends `text` (and optionally a picture) to the correspondent bound to `code`.
    #[instrument(skip(self, text))]
    pub async fn send_message(
        &self,
        code: &str,
        text: &str,
        picture_url: Option<&str>,
    ) -> Result<()> {
        let to = self
            .sessions
            .correspondent(code)
            .ok_or_else(|| PlaygroundError::UnknownSession(code.to_string()))?;
        self.deliver(code, &to, text, picture_url).await
    }

    async fn deliver(
        &self,
        code: &str,
        to: &str,
        text: &str,
        picture_url: Option<&str>,
    ) -> Result<()> {
        let outbound = OutboundMessage {
            to: to.to_string(),
            body: text.to_string(),
            media_url: picture_url.map(str::to_string),
        };
        self.transport.send_message(&outbound).await?;
        info!(
            to = %to,
            message = %text,
            picture_url = ?picture_url,
            conversation_code = %code,
            "Sent message"
        );
        Ok(())
    }

    /// Collects the next reply of type `expected` from the correspondent bound to `code`.
    ///
    /// Only that correspondent's messages are considered. The first unconsumed one at or
    /// after `not_before` is consumed unconditionally; when it does not decode as `expected`
    /// a retry prompt is sent and the caller is told to wait. With no candidate message
    /// nothing is consumed.
    #[instrument(skip(self))]
    pub async fn collect_response(
        &self,
        code: &str,
        expected: ResponseType,
        not_before: DateTime<Utc>,
    ) -> Result<PollOutcome<ResponseValue>> {
        let phone = self
            .sessions
            .correspondent(code)
            .ok_or_else(|| PlaygroundError::UnknownSession(code.to_string()))?;

        let messages = self
            .transport
            .list_messages(&MessageQuery::from_correspondent(&phone, not_before))
            .await?;

        let candidates = self
            .pending(messages, not_before)
            .into_iter()
            .filter(|m| m.from == phone);

        for message in candidates {
            if !self.handled.mark(&message.id) {
                continue;
            }
            info!(
                response_type = %expected,
                from = %phone,
                body = %message.body,
                num_media = message.num_media,
                conversation_code = %code,
                "Received response message"
            );

            let decoded = match expected {
                ResponseType::Picture => self.decode_picture(&message).await,
                _ => decode_text(expected, &message.body),
            };

            return match decoded {
                Ok(value) => Ok(PollOutcome::Ready(value)),
                Err(prompt) => {
                    if let Err(e) = self.deliver(code, &phone, prompt, None).await {
                        warn!(error = %e, conversation_code = %code, "Failed to send retry prompt");
                    }
                    Ok(self.wait())
                }
            };
        }

        Ok(self.wait())
    }

    /// Creates a picture record from the message's first media item, or returns the retry
    /// prompt when the message has no usable media.
    async fn decode_picture(&self, message: &InboundMessage) -> std::result::Result<ResponseValue, &'static str> {
        if !message.has_media() {
            return Err(PICTURE_RETRY_PROMPT);
        }
        // Already consumed: a failed lookup counts as missing media.
        let urls = match self.transport.media_urls(&message.id).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Failed to list message media");
                return Err(PICTURE_RETRY_PROMPT);
            }
        };
        let Some(source_url) = urls.into_iter().next() else {
            warn!(message_id = %message.id, "Message reported media but none was listed");
            return Err(PICTURE_RETRY_PROMPT);
        };
        let record = self.pictures.create(&source_url);
        info!(
            from = %message.from,
            picture_code = %record.code,
            "Created picture from response"
        );
        Ok(ResponseValue::Picture(record.code))
    }
}
