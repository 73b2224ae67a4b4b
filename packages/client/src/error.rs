//! Error types for the terminal client.

use roomchat_server::domain::ChatError;
use roomchat_shared::config::ConfigError;
use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid startup configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the chat layers
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Terminal input could not be read
    #[error("input error: {0}")]
    Input(String),
}
