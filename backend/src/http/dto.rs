//! Request and response bodies of the relay API.

use serde::{Deserialize, Serialize};

pub use crate::models::NotificationRequest;

/// Success body of `POST /notify`: always `{"success": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub success: bool,
}

impl NotifyResponse {
    pub fn sent() -> Self {
        Self { success: true }
    }
}

/// Failure body of every relay endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Provider error payload, or a diagnostic message
    pub error: serde_json::Value,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}
