//! reqwest を使った RoomGateway 実装
//!
//! ## 責務
//!
//! - バックエンドの REST API へのリクエスト発行
//! - ステータスコードの解釈とドメインエラーへの変換
//!
//! リトライは行わない（1 回の呼び出しにつき 1 回のリクエスト）。

use async_trait::async_trait;
use reqwest::{Client, StatusCode, redirect};
use roomchat_shared::config::BackendConfig;

use crate::{
    domain::{
        ChatError, ChatMessage, Room, RoomGateway, RoomId,
        error::{MISSING_ROOM_ID_MESSAGE, ROOM_UNAVAILABLE_MESSAGE},
    },
    infrastructure::dto::{
        conversion::parse_message_value,
        http::{CreateRoomRequest, HistoryPayload, RoomDto},
    },
};

/// HTTP client for the external chat backend
pub struct HttpRoomGateway {
    config: BackendConfig,
    http: Client,
}

impl HttpRoomGateway {
    /// Create a new gateway client
    ///
    /// Redirects are not followed so that a `302` from the lookup endpoint is
    /// seen as such.
    pub fn new(config: BackendConfig) -> Result<Self, ChatError> {
        let http = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { config, http })
    }

    async fn lookup_room(&self, room_id: &str) -> Result<Option<Room>, ChatError> {
        let url = self.config.api_url(&["api", "room", room_id]);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Room lookup for '{}' answered {}", room_id, status);

        if status == StatusCode::OK || status == StatusCode::FOUND {
            let dto: RoomDto = response.json().await?;
            return room_from_dto(dto).map(Some);
        }

        Ok(None)
    }

    async fn create_room(&self, room_id: &str) -> Result<Room, ChatError> {
        let url = self.config.api_url(&["api", "room", "create-room"]);
        let response = self
            .http
            .post(url)
            .json(&CreateRoomRequest { room_id })
            .send()
            .await?;
        let status = response.status();

        if status != StatusCode::CREATED {
            tracing::warn!("Room creation for '{}' answered {}", room_id, status);
            return Err(ChatError::RoomUnavailable(
                ROOM_UNAVAILABLE_MESSAGE.to_string(),
            ));
        }

        let dto: RoomDto = response.json().await?;
        room_from_dto(dto)
    }
}

fn room_from_dto(dto: RoomDto) -> Result<Room, ChatError> {
    Room::try_from(dto).map_err(|e| {
        tracing::warn!("Backend returned an unusable room representation: {}", e);
        ChatError::RoomUnavailable(ROOM_UNAVAILABLE_MESSAGE.to_string())
    })
}

#[async_trait]
impl RoomGateway for HttpRoomGateway {
    async fn check_or_create_room(&self, room_id: &str) -> Result<Room, ChatError> {
        if let Some(room) = self.lookup_room(room_id).await? {
            tracing::info!("Room '{}' exists", room.room_id);
            return Ok(room);
        }

        let room = self.create_room(room_id).await?;
        tracing::info!("Room '{}' created", room.room_id);
        Ok(room)
    }

    async fn fetch_message_history(&self, room_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        let room_id = RoomId::new(room_id.to_string())
            .map_err(|_| ChatError::InvalidInput(MISSING_ROOM_ID_MESSAGE.to_string()))?;

        let url = self
            .config
            .api_url(&["api", "room", room_id.as_str(), "messages"]);
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!("History fetch for '{}' answered {}", room_id, status);
            return Err(ChatError::HistoryFetchFailed {
                status: status.as_u16(),
            });
        }

        let payload: HistoryPayload = response.json().await?;
        let messages: Vec<ChatMessage> = payload
            .into_entries()
            .into_iter()
            .filter_map(|value| parse_message_value(value, &room_id))
            .collect();

        tracing::debug!(
            "Fetched {} message(s) of history for '{}'",
            messages.len(),
            room_id
        );
        Ok(messages)
    }
}
