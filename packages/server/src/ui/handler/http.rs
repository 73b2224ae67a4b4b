//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{ChatError, error::MISSING_ROOM_ID_MESSAGE},
    infrastructure::dto::{
        http::{
            CheckRoomRequest, CheckRoomResponse, ErrorResponse, GetMessagesQuery,
            GetMessagesResponse, MessageResponse, RoomDto,
        },
        message::ChatMessageDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `POST /api/check-room`: find the room or create it
///
/// `200 {"room": ...}` on success, `400 {"message": ...}` otherwise.
pub async fn check_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckRoomRequest>,
) -> Response {
    match state
        .check_room_usecase
        .execute(request.room_id.as_deref())
        .await
    {
        Ok(room) => {
            // Domain Model から DTO への変換
            let body = CheckRoomResponse {
                room: RoomDto::from(room),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::warn!("check-room failed: {}", e);
            let body = MessageResponse {
                message: e.user_message(),
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}

/// `GET /api/get-messages?roomId=`: message history of a room
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetMessagesQuery>,
) -> Response {
    match state
        .get_messages_usecase
        .execute(query.room_id.as_deref())
        .await
    {
        Ok(messages) => {
            let body = GetMessagesResponse {
                messages: messages.into_iter().map(ChatMessageDto::from).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::warn!("get-messages failed: {}", e);
            let (status, error) = history_error_response(&e);
            (status, Json(ErrorResponse { error })).into_response()
        }
    }
}

fn history_error_response(error: &ChatError) -> (StatusCode, String) {
    match error {
        ChatError::InvalidInput(_) => (
            StatusCode::BAD_REQUEST,
            MISSING_ROOM_ID_MESSAGE.to_string(),
        ),
        ChatError::HistoryFetchFailed { status } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            "Failed to fetch messages".to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        ),
    }
}
