//! # Intellectus
//!
//! Glue for the student-risk dashboard.
//!
//! Risk prediction itself happens in an external analysis service; this crate
//! talks to that service, turns its answers into dashboard view models, and
//! runs the small relay that forwards guardian alerts to an email provider.
//!
//! ## Architecture
//!
//! - [`models`]: Student and summary records, notification payloads
//! - [`analysis`]: Client for the analysis service (upload, then summary)
//! - [`dashboard`]: Upload cycle, panel view models, relay client
//! - [`mail`]: Email provider seam and the MailerSend implementation
//! - [`config`]: Relay configuration resolved once at startup
//! - [`http`]: Axum notification relay (`POST /notify`)
//!
//! ## Control flow
//!
//! ```text
//! files ─► analysis ─► dashboard ─► RelayClient ─► http (relay) ─► mail ─► provider
//! ```

pub mod analysis;
pub mod config;
pub mod dashboard;
pub mod mail;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
