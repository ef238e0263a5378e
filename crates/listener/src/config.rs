//! Listener configuration, sourced from the environment.

use thiserror::Error;

/// Default bind port when `PORT` is not set.
const DEFAULT_PORT: u16 = 5000;

/// Problems that prevent the listener from starting.
///
/// Configuration is validated once at startup; the listener never runs
/// with an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `GITHUB_WEBHOOK_SECRET` is unset or empty.
    #[error("GITHUB_WEBHOOK_SECRET must be set to the webhook shared secret")]
    MissingWebhookSecret,

    /// `PORT` is set but is not a valid TCP port number.
    #[error("PORT value '{0}' is not a valid port number")]
    InvalidPort(String),
}

/// Runtime configuration for the listener binary.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Shared secret GitHub signs every delivery with.
    pub webhook_secret: String,
    /// Optional downstream endpoint events are POSTed to.
    pub event_endpoint: Option<String>,
    /// Optional bearer token for the downstream endpoint.
    pub event_endpoint_token: Option<String>,
    /// TCP port to bind.
    pub port: u16,
}

impl ListenerConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the webhook secret is missing or the
    /// port is unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`], with an injectable variable lookup for tests.
    ///
    /// [`from_env`]: ListenerConfig::from_env
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let webhook_secret = lookup("GITHUB_WEBHOOK_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingWebhookSecret)?;

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            webhook_secret,
            event_endpoint: lookup("EVENT_BUS_ENDPOINT").filter(|s| !s.is_empty()),
            event_endpoint_token: lookup("EVENT_BUS_TOKEN").filter(|s| !s.is_empty()),
            port,
        })
    }
}
