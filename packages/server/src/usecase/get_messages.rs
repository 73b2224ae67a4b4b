//! UseCase: メッセージ履歴の取得

use std::sync::Arc;

use crate::domain::{ChatError, ChatMessage, RoomGateway, error::MISSING_ROOM_ID_MESSAGE};

/// メッセージ履歴取得のユースケース
pub struct GetMessagesUseCase {
    /// Gateway（外部バックエンドの抽象化）
    gateway: Arc<dyn RoomGateway>,
}

impl GetMessagesUseCase {
    /// 新しい GetMessagesUseCase を作成
    pub fn new(gateway: Arc<dyn RoomGateway>) -> Self {
        Self { gateway }
    }

    /// 履歴取得を実行
    ///
    /// `room_id` が未指定の場合は `InvalidInput`。空文字の検証は Gateway が行う。
    pub async fn execute(&self, room_id: Option<&str>) -> Result<Vec<ChatMessage>, ChatError> {
        let room_id = room_id
            .ok_or_else(|| ChatError::InvalidInput(MISSING_ROOM_ID_MESSAGE.to_string()))?;

        self.gateway.fetch_message_history(room_id).await
    }
}
