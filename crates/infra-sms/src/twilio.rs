// Twilio REST API Client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use uneventful_core::error::{AppError, Result};
use uneventful_core::port::{SmsReceipt, SmsSender};

/// Twilio credentials, read from the environment
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl TwilioConfig {
    /// Read TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN / TWILIO_PHONE_NUMBER.
    /// Returns None when any of them is missing or empty: the daemon then
    /// runs with SMS delivery disabled.
    pub fn from_env() -> Option<Self> {
        let account_sid = non_empty_env("TWILIO_ACCOUNT_SID")?;
        let auth_token = non_empty_env("TWILIO_AUTH_TOKEN")?;
        let from_number = non_empty_env("TWILIO_PHONE_NUMBER")?;
        Some(Self {
            account_sid,
            auth_token,
            from_number,
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// SmsSender backed by the Twilio Messages API
pub struct TwilioSmsSender {
    client: reqwest::Client,
    config: TwilioConfig,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    message: String,
    code: Option<i64>,
}

impl TwilioSmsSender {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: "https://api.twilio.com".to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(config: TwilioConfig, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: base_url.into(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt> {
        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Sms(format!("Twilio request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<TwilioError>().await {
                Ok(err) => match err.code {
                    Some(code) => format!("{} (code {})", err.message, code),
                    None => err.message,
                },
                Err(_) => format!("HTTP {}", status),
            };
            warn!(to, %status, "Twilio rejected message");
            return Err(AppError::Sms(format!("Twilio error: {}", detail)));
        }

        let message: MessageResponse = response
            .json()
            .await
            .map_err(|e| AppError::Sms(format!("Invalid Twilio response: {}", e)))?;

        debug!(to, sid = %message.sid, "SMS accepted by Twilio");
        Ok(SmsReceipt {
            message_id: message.sid,
        })
    }
}

/// Stand-in sender used when Twilio credentials are absent.
/// Every send fails so callers surface a clear configuration error.
pub struct DisabledSmsSender;

#[async_trait]
impl SmsSender for DisabledSmsSender {
    async fn send(&self, _to: &str, _body: &str) -> Result<SmsReceipt> {
        Err(AppError::Sms("Twilio is not configured".to_string()))
    }
}
