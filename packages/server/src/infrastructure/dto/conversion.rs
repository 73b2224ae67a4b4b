//! Conversion logic between DTOs and domain entities.
//!
//! Inbound payloads are validated here; anything that does not convert is
//! quarantined (logged and skipped) instead of reaching the view.

use serde_json::Value;

use crate::domain::{ChatMessage, Room, RoomId, Username, ValueObjectError};

use super::{http::RoomDto, message::ChatMessageDto};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<RoomDto> for Room {
    type Error = ValueObjectError;

    fn try_from(dto: RoomDto) -> Result<Self, Self::Error> {
        Ok(Self {
            room_id: RoomId::new(dto.room_id)?,
            attributes: dto.attributes,
        })
    }
}

impl ChatMessageDto {
    /// Validate and convert into a domain message
    ///
    /// # Arguments
    ///
    /// * `fallback_room_id` - Room used when the payload omits `roomId`
    pub fn into_domain(self, fallback_room_id: &RoomId) -> Result<ChatMessage, ValueObjectError> {
        if self.timestamp.trim().is_empty() {
            return Err(ValueObjectError::EmptyTimestamp);
        }

        let room_id = match self.room_id {
            Some(room_id) => RoomId::new(room_id)?,
            None => fallback_room_id.clone(),
        };

        Ok(ChatMessage::new(
            Username::new(self.sender)?,
            room_id,
            self.message,
            self.timestamp,
        ))
    }
}

/// Parse one raw JSON payload into a message, or quarantine it
pub fn parse_message_value(value: Value, fallback_room_id: &RoomId) -> Option<ChatMessage> {
    let dto = match serde_json::from_value::<ChatMessageDto>(value) {
        Ok(dto) => dto,
        Err(e) => {
            tracing::warn!("Quarantined malformed message payload: {}", e);
            return None;
        }
    };

    match dto.into_domain(fallback_room_id) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::warn!("Quarantined invalid message payload: {}", e);
            None
        }
    }
}

/// Parse a message from a JSON text body (broker frames), or quarantine it
pub fn parse_message_text(text: &str, fallback_room_id: &RoomId) -> Option<ChatMessage> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => parse_message_value(value, fallback_room_id),
        Err(e) => {
            tracing::warn!("Quarantined non-JSON message body: {}", e);
            None
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Room> for RoomDto {
    fn from(model: Room) -> Self {
        Self {
            room_id: model.room_id.into_string(),
            attributes: model.attributes,
        }
    }
}

impl From<ChatMessage> for ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            sender: model.sender.into_string(),
            room_id: Some(model.room_id.into_string()),
            message: model.message,
            timestamp: model.timestamp,
        }
    }
}
