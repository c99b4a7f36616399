//! Calls from the dashboard to the notification relay.

use std::time::Duration;

use tracing::warn;

use super::Acknowledgment;
use crate::models::{NotificationRequest, StudentRecord};

pub const DEFAULT_RELAY_URL: &str = "http://localhost:4000";

/// What came of one notify click.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    /// Relay answered `{"success": true}`
    Sent,
    /// Relay answered without success; carries its `error` field
    Failed(serde_json::Value),
    /// No usable answer from the relay
    Unreachable(String),
}

impl NotifyOutcome {
    /// Message shown to the user. `relay_port` names the port the relay was
    /// expected on.
    pub fn acknowledgment(&self, relay_port: u16) -> Acknowledgment {
        match self {
            NotifyOutcome::Sent => Acknowledgment::new("Notification sent successfully!"),
            NotifyOutcome::Failed(error) => {
                Acknowledgment::new(format!("Failed to send notification: {}", error))
            }
            NotifyOutcome::Unreachable(_) => Acknowledgment::new(format!(
                "Error: Is the notification server running on port {}?",
                relay_port
            )),
        }
    }
}

/// HTTP client for `POST /notify`.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
    port: u16,
}

impl RelayClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let port = reqwest::Url::parse(base_url)
            .ok()
            .and_then(|url| url.port_or_known_default())
            .unwrap_or(crate::config::DEFAULT_PORT);

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            port,
        })
    }

    /// Port the relay is expected on, for user-facing messages.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Send one notification. Never retries.
    pub async fn send(&self, request: &NotificationRequest) -> NotifyOutcome {
        let url = format!("{}/notify", self.base_url);
        let response = match self.client.post(&url).json(request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "notification relay unreachable");
                return NotifyOutcome::Unreachable(e.to_string());
            }
        };

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "unreadable answer from notification relay");
                return NotifyOutcome::Unreachable(e.to_string());
            }
        };

        if body.get("success").and_then(|v| v.as_bool()) == Some(true) {
            NotifyOutcome::Sent
        } else {
            NotifyOutcome::Failed(body.get("error").cloned().unwrap_or_default())
        }
    }

    /// Send the risk alert for `student` to their guardian.
    pub async fn notify_student(&self, student: &StudentRecord) -> NotifyOutcome {
        self.send(&NotificationRequest::risk_alert(student)).await
    }
}
