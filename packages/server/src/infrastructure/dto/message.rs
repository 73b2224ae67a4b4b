//! Chat message payload.
//!
//! The same JSON object travels in history responses and in broker frames:
//!
//! ```json
//! {"sender":"alice","roomId":"room1","message":"hi","timestamp":"2024-01-01T00:00:00.000Z"}
//! ```

use serde::{Deserialize, Serialize};

/// Chat message on the wire
///
/// `roomId` is optional on input because history entries may omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub sender: String,
    #[serde(rename = "roomId", default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_room_id() {
        // テスト項目: roomId を含まない履歴エントリもデシリアライズできる
        // given (前提条件):
        let json = r#"{"sender":"bob","message":"hey","timestamp":"T1"}"#;

        // when (操作):
        let dto: ChatMessageDto = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(dto.sender, "bob");
        assert_eq!(dto.room_id, None);
        assert_eq!(dto.message, "hey");
    }

    #[test]
    fn test_deserialize_rejects_missing_message_field() {
        // テスト項目: message フィールドがないペイロードは拒否される
        // given (前提条件):
        let json = r#"{"sender":"bob","timestamp":"T1"}"#;

        // when (操作):
        let result = serde_json::from_str::<ChatMessageDto>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_camel_case_room_id() {
        // テスト項目: 送信時は roomId というキー名でシリアライズされる
        // given (前提条件):
        let dto = ChatMessageDto {
            sender: "alice".to_string(),
            room_id: Some("room1".to_string()),
            message: "hi".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        };

        // when (操作):
        let value = serde_json::to_value(&dto).unwrap();

        // then (期待する結果):
        assert_eq!(value["roomId"], "room1");
        assert_eq!(value["message"], "hi");
    }
}
