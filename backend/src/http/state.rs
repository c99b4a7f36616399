//! Application state for the relay.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::mail::{MailProvider, MailerSend, ProviderError};

/// Shared state passed to all handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Email provider every notification is forwarded to
    pub provider: Arc<dyn MailProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MailProvider>) -> Self {
        Self { provider }
    }

    /// State backed by MailerSend, built from the configuration resolved at
    /// process start.
    pub fn mailersend(config: &RelayConfig) -> Result<Self, ProviderError> {
        let provider = MailerSend::from_config(config)?;
        Ok(Self::new(Arc::new(provider)))
    }
}
