//! # twilio-client
//!
//! [`MessageTransport`] over the Twilio REST API: lists inbound messages sent to the
//! broker's number, resolves attached media to public URLs, and sends SMS/MMS.

mod api;

use async_trait::async_trait;
use playground_core::{
    InboundMessage, MessageQuery, MessageTransport, OutboundMessage, TransportError,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use api::{ApiErrorBody, MediaList, MessageList};

/// Default Twilio API root.
pub const DEFAULT_API_URL: &str = "https://api.twilio.com";

/// Messages requested per listing.
const PAGE_SIZE: u32 = 100;

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// Twilio account credentials plus the number the broker sends from and listens on.
#[derive(Clone)]
pub struct TwilioClient {
    http: Client,
    api_url: String,
    account_sid: String,
    auth_token: String,
    phone_number: String,
}

impl TwilioClient {
    pub fn new(account_sid: String, auth_token: String, phone_number: String) -> Self {
        Self::with_api_url(DEFAULT_API_URL.to_string(), account_sid, auth_token, phone_number)
    }

    /// Uses a custom API root (tests point this at a mock server).
    pub fn with_api_url(
        api_url: String,
        account_sid: String,
        auth_token: String,
        phone_number: String,
    ) -> Self {
        info!(
            api_url = %api_url,
            account_sid = %account_sid,
            auth_token = %mask_token(&auth_token),
            phone_number = %phone_number,
            "Twilio client configured"
        );
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            account_sid,
            auth_token,
            phone_number,
        }
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    fn account_url(&self, path: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/{}",
            self.api_url, self.account_sid, path
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.account_sid, Some(&self.auth_token))
    }

    async fn send_request(request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        Err(TransportError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TransportError> {
        Self::send_request(self.authorized(request))
            .await?
            .json::<T>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MessageTransport for TwilioClient {
    #[instrument(skip(self))]
    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<InboundMessage>, TransportError> {
        let mut params = vec![
            ("To".to_string(), self.phone_number.clone()),
            ("PageSize".to_string(), PAGE_SIZE.to_string()),
        ];
        if let Some(from) = &query.from {
            params.push(("From".to_string(), from.clone()));
        }
        if let Some(after) = query.sent_after {
            params.push((
                "DateSent>".to_string(),
                after.format("%Y-%m-%d").to_string(),
            ));
        }

        let list: MessageList = self
            .get_json(self.http.get(self.account_url("Messages.json")).query(&params))
            .await?;
        let total = list.messages.len();
        let inbound = list
            .messages
            .into_iter()
            .filter(|m| m.is_inbound())
            .map(|m| m.into_inbound())
            .collect::<Result<Vec<_>, _>>()?;
        debug!(listed = total, inbound = inbound.len(), "Listed Twilio messages");
        Ok(inbound)
    }

    #[instrument(skip(self))]
    async fn media_urls(&self, message_id: &str) -> Result<Vec<String>, TransportError> {
        let list: MediaList = self
            .get_json(
                self.http
                    .get(self.account_url(&format!("Messages/{message_id}/Media.json"))),
            )
            .await?;
        Ok(list
            .media_list
            .into_iter()
            .map(|m| {
                let uri = m.uri.strip_suffix(".json").unwrap_or(&m.uri);
                format!("{}{}", self.api_url, uri)
            })
            .collect())
    }

    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send_message(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let mut form = vec![
            ("To", message.to.as_str()),
            ("From", self.phone_number.as_str()),
            ("Body", message.body.as_str()),
        ];
        if let Some(media_url) = &message.media_url {
            form.push(("MediaUrl", media_url.as_str()));
        }
        let request = self
            .authorized(self.http.post(self.account_url("Messages.json")))
            .form(&form);
        Self::send_request(request).await?;
        debug!(to = %message.to, has_media = message.media_url.is_some(), "Twilio message accepted");
        Ok(())
    }
}
