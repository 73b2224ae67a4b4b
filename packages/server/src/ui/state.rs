//! Server state.

use std::sync::Arc;

use crate::usecase::{CheckRoomUseCase, GetMessagesUseCase};

/// Shared application state
pub struct AppState {
    /// CheckRoomUseCase（ルーム確認・作成のユースケース）
    pub check_room_usecase: Arc<CheckRoomUseCase>,
    /// GetMessagesUseCase（履歴取得のユースケース）
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
}
