//! Base config: Twilio account and logging. Loaded from env.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_PHONE_NUMBER: &str = "+12407536527";

/// Base config: Twilio-related and logging only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// TWILIO_ACCOUNT_SID
    pub account_sid: String,
    /// TWILIO_AUTH_TOKEN
    pub auth_token: String,
    /// TWILIO_PHONE_NUMBER; the number correspondents text
    pub phone_number: String,
    /// TWILIO_API_URL
    pub twilio_api_url: String,
    /// Log file path
    pub log_file: String,
}

impl BaseConfig {
    /// Load from environment variables. Account SID and auth token are required.
    pub fn load() -> Result<Self> {
        let account_sid =
            env::var("TWILIO_ACCOUNT_SID").context("TWILIO_ACCOUNT_SID not set")?;
        let auth_token = env::var("TWILIO_AUTH_TOKEN").context("TWILIO_AUTH_TOKEN not set")?;
        let phone_number =
            env::var("TWILIO_PHONE_NUMBER").unwrap_or_else(|_| DEFAULT_PHONE_NUMBER.to_string());
        let twilio_api_url = env::var("TWILIO_API_URL")
            .unwrap_or_else(|_| twilio_client::DEFAULT_API_URL.to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/sms-playground.log".to_string());

        Ok(Self {
            account_sid,
            auth_token,
            phone_number,
            twilio_api_url,
            log_file,
        })
    }

    /// Validate config (TWILIO_API_URL must be a valid URL, credentials non-empty).
    pub fn validate(&self) -> Result<()> {
        if self.account_sid.trim().is_empty() || self.auth_token.trim().is_empty() {
            anyhow::bail!("TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN must not be empty");
        }
        if reqwest::Url::parse(&self.twilio_api_url).is_err() {
            anyhow::bail!("TWILIO_API_URL is not a valid URL: {}", self.twilio_api_url);
        }
        Ok(())
    }
}
