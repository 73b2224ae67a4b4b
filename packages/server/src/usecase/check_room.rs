//! UseCase: ルームの確認または作成
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存ルームが見つかる / 新規ルームが作成される
//! - 異常系：ルーム ID が空、ルームの取得も作成もできない

use std::sync::Arc;

use crate::domain::{ChatError, Room, RoomGateway, error::MISSING_ROOM_ID_MESSAGE};

/// ルーム確認のユースケース
pub struct CheckRoomUseCase {
    /// Gateway（外部バックエンドの抽象化）
    gateway: Arc<dyn RoomGateway>,
}

impl CheckRoomUseCase {
    /// 新しい CheckRoomUseCase を作成
    pub fn new(gateway: Arc<dyn RoomGateway>) -> Self {
        Self { gateway }
    }

    /// ルームの確認（存在しなければ作成）を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - ユーザーが入力したルーム ID
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - バックエンドが返したルーム
    /// * `Err(ChatError)` - 入力不備、またはルームが利用できない
    pub async fn execute(&self, room_id: Option<&str>) -> Result<Room, ChatError> {
        let room_id = room_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ChatError::InvalidInput(MISSING_ROOM_ID_MESSAGE.to_string()))?;

        self.gateway.check_or_create_room(room_id).await
    }
}
