//! Backend configuration.
//!
//! Every outbound call (REST and the messaging channel) is derived from a
//! single backend base URL, provided through the environment.

use thiserror::Error;
use url::Url;

/// Environment variable the binaries read the backend base URL from
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Path of the broker's raw WebSocket entry point
const BROKER_PATH: [&str; 2] = ["chat", "websocket"];

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// URL could not be parsed
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// URL parsed but is not an http(s) URL
    #[error("unsupported backend URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
}

/// Resolved backend endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: Url,
    broker_url: Url,
}

impl BackendConfig {
    /// Parse and validate a backend base URL such as `http://localhost:8080`
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        let broker_scheme = match base_url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };

        let mut broker_url = join_segments(&base_url, &BROKER_PATH);
        broker_url
            .set_scheme(broker_scheme)
            .map_err(|_| ConfigError::UnsupportedScheme(base_url.scheme().to_string()))?;

        Ok(Self {
            base_url,
            broker_url,
        })
    }

    /// Base URL as configured
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// REST URL for the given path segments; each segment is percent-encoded
    pub fn api_url(&self, segments: &[&str]) -> Url {
        join_segments(&self.base_url, segments)
    }

    /// WebSocket URL of the message broker
    pub fn broker_url(&self) -> &Url {
        &self.broker_url
    }
}

fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
