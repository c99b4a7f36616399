//! Email delivery providers.
//!
//! The relay only talks to [`MailProvider`]; the concrete provider owns the
//! credential, the sender identity and the wire payload.

mod mailersend;

pub use mailersend::MailerSend;

use async_trait::async_trait;

/// A message ready to hand to a provider. The sender comes from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl From<crate::models::NotificationRequest> for OutboundEmail {
    fn from(request: crate::models::NotificationRequest) -> Self {
        Self {
            to: request.to,
            subject: request.subject,
            text: request.message,
        }
    }
}

/// Ways a single send attempt can fail.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("provider rejected the send with status {status}: {body}")]
    Rejected {
        status: u16,
        /// Error payload as reported by the provider
        body: serde_json::Value,
    },

    /// The provider could not be reached or its answer could not be read.
    #[error("{message}")]
    Transport { message: String, timed_out: bool },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Setup(String),
}

impl ProviderError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timed_out: false,
        }
    }
}

/// A transactional email API.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Make exactly one send attempt. No retries.
    async fn send(&self, email: &OutboundEmail) -> Result<(), ProviderError>;
}
