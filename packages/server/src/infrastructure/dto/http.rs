//! HTTP request / response bodies.
//!
//! The first group mirrors the external backend's REST API; the second group
//! is the surface `/api/check-room` and `/api/get-messages` expose.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::ChatMessageDto;

// ========================================
// Backend REST API
// ========================================

/// Room representation returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDto {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// `POST /api/room/create-room` body
#[derive(Debug, Clone, Serialize)]
pub struct CreateRoomRequest<'a> {
    #[serde(rename = "roomId")]
    pub room_id: &'a str,
}

/// `GET /api/room/{roomId}/messages` body, either bare or wrapped
///
/// Entries are kept as raw JSON so that malformed ones can be skipped
/// individually.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HistoryPayload {
    Bare(Vec<Value>),
    Wrapped { messages: Vec<Value> },
}

impl HistoryPayload {
    pub fn into_entries(self) -> Vec<Value> {
        match self {
            HistoryPayload::Bare(messages) => messages,
            HistoryPayload::Wrapped { messages } => messages,
        }
    }
}

// ========================================
// Front-facing HTTP surface
// ========================================

/// `POST /api/check-room` body
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRoomRequest {
    #[serde(rename = "roomId", default)]
    pub room_id: Option<String>,
}

/// `POST /api/check-room` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRoomResponse {
    pub room: RoomDto,
}

/// `POST /api/check-room` failure body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `GET /api/get-messages` query string
#[derive(Debug, Clone, Deserialize)]
pub struct GetMessagesQuery {
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

/// `GET /api/get-messages` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMessagesResponse {
    pub messages: Vec<ChatMessageDto>,
}

/// `GET /api/get-messages` failure body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
