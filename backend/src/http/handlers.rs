//! HTTP handlers for the relay API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::dto::{HealthResponse, NotificationRequest, NotifyResponse};
use super::error::RelayError;
use super::state::AppState;
use crate::mail::OutboundEmail;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, RelayError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "notification-relay".to_string(),
    })
}

// =============================================================================
// Notifications
// =============================================================================

/// POST /notify
///
/// Forward one notification to the email provider. Exactly one send attempt
/// is made; the caller learns the outcome from the status code.
pub async fn notify(
    State(state): State<AppState>,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> HandlerResult<NotifyResponse> {
    let Json(request) = payload.map_err(|e| RelayError::BadRequest(e.body_text()))?;
    let email = OutboundEmail::from(request);

    let span = info_span!(
        "notify",
        request_id = %Uuid::new_v4(),
        provider = state.provider.name()
    );

    async move {
        match state.provider.send(&email).await {
            Ok(()) => {
                info!(to = %email.to, "notification sent");
                Ok(Json(NotifyResponse::sent()))
            }
            Err(e) => {
                error!(to = %email.to, error = %e, "notification failed");
                Err(e.into())
            }
        }
    }
    .instrument(span)
    .await
}
