//! Notification relay binary.
//!
//! Serves `POST /notify` and forwards each request to the configured email
//! provider.
//!
//! # Usage
//!
//! ```bash
//! MAILERSEND_API_KEY=mlsn.xxx MAILERSEND_FROM=alerts@school.example \
//!   cargo run --bin intellectus-relay
//!
//! # With a config file (environment still wins)
//! INTELLECTUS_CONFIG=relay.toml cargo run --bin intellectus-relay
//! ```
//!
//! # Environment Variables
//!
//! - `INTELLECTUS_CONFIG`: optional TOML config file
//! - `RUST_LOG`: Log level (default: info)
//! - see [`intellectus::config`] for the relay settings

use std::env;
use std::path::PathBuf;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use intellectus::config::RelayConfig;
use intellectus::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting notification relay");

    let config_path = env::var("INTELLECTUS_CONFIG").ok().map(PathBuf::from);
    let config = RelayConfig::load(config_path.as_deref())?;
    let addr = config.bind_addr()?;
    info!(
        provider_url = %config.provider_url,
        sender = %config.sender_email,
        timeout = ?config.provider_timeout,
        "Configuration loaded"
    );

    let state = AppState::mailersend(&config)?;
    let app = create_router(state);

    info!("Relay listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay stopped");
    Ok(())
}

/// Resolves on Ctrl-C. Requests already in flight are allowed to finish.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
