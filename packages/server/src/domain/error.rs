//! Error taxonomy of the chat front end.
//!
//! Every failure degrades to a user-visible message or a silent no-op; none of
//! these variants is fatal to the process.

use thiserror::Error;

/// Message shown when a room can be neither found nor created
pub const ROOM_UNAVAILABLE_MESSAGE: &str = "Room not found and could not be created";

/// Message shown when the join form is incomplete
pub const MISSING_JOIN_FIELDS_MESSAGE: &str = "Please enter both username and room ID";

/// Message shown when a history request has no room id
pub const MISSING_ROOM_ID_MESSAGE: &str = "Room ID is required";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Missing username or room id
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Lookup and create both failed
    #[error("room unavailable: {0}")]
    RoomUnavailable(String),

    /// History endpoint answered with a non-success status
    #[error("failed to fetch message history (upstream status {status})")]
    HistoryFetchFailed { status: u16 },

    /// Network failure reaching the gateway or the broker
    #[error("transport error: {0}")]
    TransportError(String),

    /// Broker-reported error frame or malformed protocol traffic
    #[error("protocol error: {0}")]
    ProtocolError(String),
}

impl ChatError {
    /// Text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            ChatError::InvalidInput(message) | ChatError::RoomUnavailable(message) => {
                message.clone()
            }
            ChatError::HistoryFetchFailed { .. } => "Failed to fetch messages".to_string(),
            ChatError::TransportError(_) => "Server error. Try again later.".to_string(),
            ChatError::ProtocolError(message) => format!("Broker error: {}", message),
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::TransportError(err.to_string())
    }
}
