//! Gateway trait 定義
//!
//! 外部のチャットバックエンドへのアクセスをドメイン層のインターフェースとして定義します。
//! 具体的な HTTP 実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ChatError, ChatMessage, Room};

/// Backend Gateway
///
/// One attempt per call; callers decide whether to surface or retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomGateway: Send + Sync {
    /// Return the room if it exists, otherwise create it
    ///
    /// # Errors
    ///
    /// * `RoomUnavailable` - lookup failed and creation was not acknowledged with 201
    /// * `TransportError` - the backend could not be reached
    async fn check_or_create_room(&self, room_id: &str) -> Result<Room, ChatError>;

    /// Fetch the stored messages of a room, oldest first
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - `room_id` is empty (no request is made)
    /// * `HistoryFetchFailed` - non-success status from the backend
    /// * `TransportError` - the backend could not be reached
    async fn fetch_message_history(&self, room_id: &str) -> Result<Vec<ChatMessage>, ChatError>;
}
