//! Relay error handling and response mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::ErrorResponse;
use crate::mail::ProviderError;

/// Error type for relay handlers.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Request body could not be read as a notification
    #[error("{0}")]
    BadRequest(String),
    /// The send attempt failed
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            RelayError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::Value::String(msg))
            }
            // The provider's own error body passes through untouched.
            RelayError::Provider(ProviderError::Rejected { body, .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            RelayError::Provider(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::Value::String(e.to_string()),
            ),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
