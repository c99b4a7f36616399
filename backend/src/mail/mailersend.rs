//! MailerSend transactional email API.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{MailProvider, OutboundEmail, ProviderError};
use crate::config::RelayConfig;

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    from: Address<'a>,
    to: Vec<Address<'a>>,
    subject: &'a str,
    text: &'a str,
}

/// Client for MailerSend's `POST /v1/email`.
#[derive(Debug, Clone)]
pub struct MailerSend {
    client: reqwest::Client,
    api_key: String,
    url: String,
    sender_email: String,
    sender_name: Option<String>,
}

impl MailerSend {
    /// Build a client from the relay configuration, applying the provider
    /// timeout when one is configured.
    pub fn from_config(config: &RelayConfig) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.provider_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            url: config.provider_url.clone(),
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
        })
    }

    fn payload<'a>(&'a self, email: &'a OutboundEmail) -> SendPayload<'a> {
        SendPayload {
            from: Address {
                email: &self.sender_email,
                name: self.sender_name.as_deref(),
            },
            to: vec![Address {
                email: &email.to,
                name: None,
            }],
            subject: &email.subject,
            text: &email.text,
        }
    }
}

#[async_trait]
impl MailProvider for MailerSend {
    fn name(&self) -> &'static str {
        "mailersend"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(email))
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                timed_out: e.is_timeout(),
                message: format!("Failed to reach email provider: {}", e),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "email accepted by provider");
            return Ok(());
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(format!("Failed to read provider response: {}", e)))?;

        Err(ProviderError::Rejected {
            status: status.as_u16(),
            body: error_body(status.as_u16(), &text),
        })
    }
}

/// Provider error payload: the JSON body when it parses, else the raw text,
/// else a note naming the status.
fn error_body(status: u16, text: &str) -> serde_json::Value {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        return value;
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        serde_json::Value::String(format!("provider responded with status {}", status))
    } else {
        serde_json::Value::String(trimmed.to_string())
    }
}
