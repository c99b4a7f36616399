//! Relay configuration.
//!
//! Configuration is resolved once at process start, in this order:
//! built-in defaults, then an optional TOML file, then environment variables.
//! The resulting [`RelayConfig`] is handed to the HTTP state; request handlers
//! never read the environment.
//!
//! # Environment Variables
//! - `MAILERSEND_API_KEY` (required): bearer credential for the email provider
//! - `MAILERSEND_FROM` (required): sender address
//! - `MAILERSEND_FROM_NAME` (optional): sender display name
//! - `MAILERSEND_API_URL` (optional, default: `https://api.mailersend.com/v1/email`)
//! - `RELAY_HOST` (optional, default: `0.0.0.0`)
//! - `RELAY_PORT` (optional, default: `4000`)
//! - `RELAY_PROVIDER_TIMEOUT_SECS` (optional): unset or `0` disables the timeout
//!
//! # File format
//!
//! ```toml
//! [relay]
//! host = "127.0.0.1"
//! port = 4000
//! provider_timeout_secs = 15
//!
//! [mailersend]
//! api_key = "mlsn.xxxxx"
//! from = "alerts@school.example"
//! from_name = "Intellectus"
//! ```

use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PROVIDER_URL: &str = "https://api.mailersend.com/v1/email";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of an optional relay config file. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayFileConfig {
    #[serde(default)]
    pub relay: RelaySection,
    #[serde(default)]
    pub mailersend: MailerSendSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelaySection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub provider_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailerSendSection {
    pub api_key: Option<String>,
    pub from: Option<String>,
    pub from_name: Option<String>,
    pub api_url: Option<String>,
}

impl RelayFileConfig {
    /// Load a config file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().display().to_string();
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path_str,
            source,
        })
    }
}

/// Resolved relay configuration.
#[derive(Clone)]
pub struct RelayConfig {
    /// Bearer credential for the email provider
    pub api_key: String,
    /// Address every notification is sent from
    pub sender_email: String,
    pub sender_name: Option<String>,
    /// Send endpoint of the email provider
    pub provider_url: String,
    pub host: String,
    pub port: u16,
    /// `None` waits on the provider indefinitely
    pub provider_timeout: Option<Duration>,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"<redacted>")
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .field("provider_url", &self.provider_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("provider_timeout", &self.provider_timeout)
            .finish()
    }
}

impl RelayConfig {
    /// Configuration with the given credential and sender, defaults elsewhere.
    pub fn new(api_key: impl Into<String>, sender_email: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            sender_email: sender_email.into(),
            sender_name: None,
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            provider_timeout: None,
        }
    }

    /// Resolve configuration from the process environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(RelayFileConfig::default(), |key| std::env::var(key).ok())
    }

    /// Resolve configuration from an optional file overlaid with the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => RelayFileConfig::from_file(path)?,
            None => RelayFileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from file contents and a variable lookup.
    ///
    /// Variables from `lookup` take precedence over the file. Empty variables
    /// are treated as unset.
    pub fn resolve<F>(file: RelayFileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("MAILERSEND_API_KEY")
            .or(file.mailersend.api_key)
            .ok_or(ConfigError::Missing("MAILERSEND_API_KEY"))?;
        let sender_email = var("MAILERSEND_FROM")
            .or(file.mailersend.from)
            .ok_or(ConfigError::Missing("MAILERSEND_FROM"))?;
        let sender_name = var("MAILERSEND_FROM_NAME").or(file.mailersend.from_name);
        let provider_url = var("MAILERSEND_API_URL")
            .or(file.mailersend.api_url)
            .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string());

        let host = var("RELAY_HOST")
            .or(file.relay.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("RELAY_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "RELAY_PORT",
                value: raw.clone(),
                reason: "must be a valid port number".to_string(),
            })?,
            None => file.relay.port.unwrap_or(DEFAULT_PORT),
        };
        let timeout_secs = match var("RELAY_PROVIDER_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "RELAY_PROVIDER_TIMEOUT_SECS",
                value: raw.clone(),
                reason: "must be a whole number of seconds".to_string(),
            })?),
            None => file.relay.provider_timeout_secs,
        };

        Ok(Self {
            api_key,
            sender_email,
            sender_name,
            provider_url,
            host,
            port,
            provider_timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        })
    }

    /// Address the relay binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            name: "RELAY_HOST",
            value: self.host.clone(),
            reason: e.to_string(),
        })
    }
}
