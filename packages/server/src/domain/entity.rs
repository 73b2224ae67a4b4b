//! Entities
//!
//! Room はバックエンドが正とする。ここでは参照のみを保持し、変更・削除はしない。

use serde_json::{Map, Value};

use super::value_object::{RoomId, Username};

/// A chat room as described by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Identifier as resolved by the backend (may differ in casing from user input)
    pub room_id: RoomId,
    /// Remaining fields of the backend's representation, kept verbatim
    pub attributes: Map<String, Value>,
}

impl Room {
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            attributes: Map::new(),
        }
    }
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Username,
    pub room_id: RoomId,
    pub message: String,
    /// ISO-8601 string as produced by the sender
    pub timestamp: String,
}

/// Identity of a message used for de-duplication: `(sender, room, body, timestamp)`
pub type MessageKey = (String, String, String, String);

impl ChatMessage {
    pub fn new(sender: Username, room_id: RoomId, message: String, timestamp: String) -> Self {
        Self {
            sender,
            room_id,
            message,
            timestamp,
        }
    }

    /// Every field; only an exact copy (history replay, broker echo) shares it
    pub fn key(&self) -> MessageKey {
        (
            self.sender.as_str().to_string(),
            self.room_id.as_str().to_string(),
            self.message.clone(),
            self.timestamp.clone(),
        )
    }

    /// Whether the message was sent by the given user
    pub fn is_from(&self, username: &Username) -> bool {
        &self.sender == username
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sender: &str, timestamp: &str, body: &str) -> ChatMessage {
        ChatMessage::new(
            Username::new(sender.to_string()).unwrap(),
            RoomId::new("room1".to_string()).unwrap(),
            body.to_string(),
            timestamp.to_string(),
        )
    }

    #[test]
    fn test_key_of_identical_copies_matches() {
        // テスト項目: 全フィールドが同じメッセージは同じキーになる
        // given (前提条件):
        let a = message("bob", "2024-01-01T00:00:00.000Z", "hey");
        let b = message("bob", "2024-01-01T00:00:00.000Z", "hey");

        // when (操作):
        let (key_a, key_b) = (a.key(), b.key());

        // then (期待する結果):
        assert_eq!(key_a, key_b);
    }

    #[test]
    fn test_key_distinguishes_body_at_same_timestamp() {
        // テスト項目: 送信者とタイムスタンプが同じでも本文が違えば別のキーになる
        // given (前提条件):
        let a = message("bob", "2024-01-01T09:00:00", "first");
        let b = message("bob", "2024-01-01T09:00:00", "second");

        // when (操作):
        let (key_a, key_b) = (a.key(), b.key());

        // then (期待する結果):
        assert_ne!(key_a, key_b);
    }

    #[test]
    fn test_is_from() {
        // テスト項目: 送信者の判定が正しく行われる
        // given (前提条件):
        let msg = message("alice", "T1", "hi");
        let alice = Username::new("alice".to_string()).unwrap();
        let bob = Username::new("bob".to_string()).unwrap();

        // when (操作) / then (期待する結果):
        assert!(msg.is_from(&alice));
        assert!(!msg.is_from(&bob));
    }
}
