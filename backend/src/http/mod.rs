//! Notification relay HTTP server.
//!
//! A single-purpose axum service that accepts `{to, subject, message}` and
//! forwards it to the configured email provider, hiding the provider's
//! credential and payload shape from callers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - JSON parsing                                           │
//! │  - CORS, tracing, error → status mapping                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │ one call per request
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  MailProvider (mail/)                                     │
//! │  - credential, sender, provider payload                   │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Email delivery API (external)                            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests are independent and stateless. Sending the same notification
//! twice produces two emails.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::{create_router, MAX_BODY_BYTES};
pub use state::AppState;
