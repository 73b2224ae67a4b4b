//! Room negotiation: turn a username and a room id into a room to join.
//!
//! ```text
//! Idle ──submit──▶ Negotiating ──▶ Joined(ticket)
//!  ▲                    │
//!  └──acknowledge── Failed(message)
//! ```

use std::sync::Arc;

use roomchat_server::domain::{
    ChatError, RoomGateway, RoomId, Username, error::MISSING_JOIN_FIELDS_MESSAGE,
};
use url::form_urlencoded;

/// Who joins which room, as agreed with the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTicket {
    pub username: Username,
    /// Identifier as the backend knows it
    pub room_id: RoomId,
}

impl JoinTicket {
    /// `username=..&roomId=..`, form url-encoded
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("username", self.username.as_str())
            .append_pair("roomId", self.room_id.as_str())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinState {
    Idle,
    Negotiating,
    Joined(JoinTicket),
    /// User-facing reason of the last failure
    Failed(String),
}

pub struct RoomNegotiation {
    gateway: Arc<dyn RoomGateway>,
    state: JoinState,
}

impl RoomNegotiation {
    pub fn new(gateway: Arc<dyn RoomGateway>) -> Self {
        Self {
            gateway,
            state: JoinState::Idle,
        }
    }

    pub fn state(&self) -> &JoinState {
        &self.state
    }

    /// Check the room exists (creating it if needed) and hand out a ticket
    ///
    /// Both fields are required; an incomplete form is refused without
    /// contacting the backend.
    pub async fn submit(&mut self, username: &str, room_id: &str) -> Result<JoinTicket, ChatError> {
        self.acknowledge();

        let (username, room_id) = match (
            Username::new(username.trim().to_string()),
            RoomId::new(room_id.trim().to_string()),
        ) {
            (Ok(username), Ok(room_id)) => (username, room_id),
            _ => {
                let error = ChatError::InvalidInput(MISSING_JOIN_FIELDS_MESSAGE.to_string());
                self.state = JoinState::Failed(error.user_message());
                return Err(error);
            }
        };

        self.state = JoinState::Negotiating;
        tracing::info!("Negotiating room '{}' for '{}'", room_id, username);

        match self.gateway.check_or_create_room(room_id.as_str()).await {
            Ok(room) => {
                let ticket = JoinTicket {
                    username,
                    room_id: room.room_id,
                };
                tracing::info!("Joined room '{}'", ticket.room_id);
                self.state = JoinState::Joined(ticket.clone());
                Ok(ticket)
            }
            Err(e) => {
                tracing::warn!("Could not join room '{}': {}", room_id, e);
                self.state = JoinState::Failed(e.user_message());
                Err(e)
            }
        }
    }

    /// Clear a failure so the form can be submitted again
    pub fn acknowledge(&mut self) {
        if matches!(self.state, JoinState::Failed(_)) {
            self.state = JoinState::Idle;
        }
    }
}
