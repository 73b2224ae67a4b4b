//! Integration tests for the HTTP gateway against an in-process mock backend.

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use roomchat_server::{
    domain::{ChatError, RoomGateway, error::ROOM_UNAVAILABLE_MESSAGE},
    infrastructure::gateway::HttpRoomGateway,
};
use roomchat_shared::config::BackendConfig;
use serde_json::{Value, json};

/// Scripted behaviour of the mock backend
struct Backend {
    existing_room: Option<&'static str>,
    lookup_status: StatusCode,
    create_status: StatusCode,
    history_status: StatusCode,
    history_body: Value,
    lookups: AtomicUsize,
    creates: AtomicUsize,
    history_requests: AtomicUsize,
}

impl Backend {
    fn new() -> Self {
        Self {
            existing_room: None,
            lookup_status: StatusCode::OK,
            create_status: StatusCode::CREATED,
            history_status: StatusCode::OK,
            history_body: json!([]),
            lookups: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            history_requests: AtomicUsize::new(0),
        }
    }
}

async fn lookup(State(backend): State<Arc<Backend>>, Path(room_id): Path<String>) -> Response {
    backend.lookups.fetch_add(1, Ordering::SeqCst);
    match backend.existing_room {
        Some(existing) if existing.eq_ignore_ascii_case(&room_id) => (
            backend.lookup_status,
            Json(json!({"id": "665f", "roomId": existing, "messages": []})),
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    backend.creates.fetch_add(1, Ordering::SeqCst);
    (
        backend.create_status,
        Json(json!({"id": "7a1c", "roomId": body["roomId"], "messages": []})),
    )
        .into_response()
}

async fn history(State(backend): State<Arc<Backend>>, Path(_room_id): Path<String>) -> Response {
    backend.history_requests.fetch_add(1, Ordering::SeqCst);
    (backend.history_status, Json(backend.history_body.clone())).into_response()
}

async fn start_backend(backend: Arc<Backend>) -> SocketAddr {
    let app = Router::new()
        .route("/api/room/create-room", post(create))
        .route("/api/room/{room_id}", get(lookup))
        .route("/api/room/{room_id}/messages", get(history))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn gateway_for(addr: SocketAddr) -> HttpRoomGateway {
    let config = BackendConfig::parse(&format!("http://{}", addr)).unwrap();
    HttpRoomGateway::new(config).unwrap()
}

#[tokio::test]
async fn test_existing_room_is_returned_without_create_call() {
    // テスト項目: 既存ルームの場合、作成リクエストを送らずにルームが返される
    // given (前提条件):
    let backend = Arc::new(Backend {
        existing_room: Some("Room1"),
        ..Backend::new()
    });
    let gateway = gateway_for(start_backend(backend.clone()).await);

    // when (操作):
    let room = gateway.check_or_create_room("room1").await.unwrap();

    // then (期待する結果):
    assert_eq!(room.room_id.as_str(), "Room1");
    assert_eq!(room.attributes["id"], "665f");
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(backend.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_found_status_counts_as_existing_room() {
    // テスト項目: 302 で JSON が返された場合も既存ルームとして扱われる
    // given (前提条件):
    let backend = Arc::new(Backend {
        existing_room: Some("room1"),
        lookup_status: StatusCode::FOUND,
        ..Backend::new()
    });
    let gateway = gateway_for(start_backend(backend.clone()).await);

    // when (操作):
    let room = gateway.check_or_create_room("room1").await.unwrap();

    // then (期待する結果):
    assert_eq!(room.room_id.as_str(), "room1");
    assert_eq!(backend.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_room_is_created_exactly_once() {
    // テスト項目: 存在しないルームは作成リクエストが 1 回だけ送られ、作成されたルームが返される
    // given (前提条件):
    let backend = Arc::new(Backend::new());
    let gateway = gateway_for(start_backend(backend.clone()).await);

    // when (操作):
    let room = gateway.check_or_create_room("room1").await.unwrap();

    // then (期待する結果):
    assert_eq!(room.room_id.as_str(), "room1");
    assert_eq!(room.attributes["id"], "7a1c");
    assert_eq!(backend.creates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_failure_is_room_unavailable() {
    // テスト項目: 作成が 201 以外で返された場合、RoomUnavailable になる
    // given (前提条件):
    let backend = Arc::new(Backend {
        create_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..Backend::new()
    });
    let gateway = gateway_for(start_backend(backend.clone()).await);

    // when (操作):
    let result = gateway.check_or_create_room("room1").await;

    // then (期待する結果):
    assert_eq!(
        result,
        Err(ChatError::RoomUnavailable(
            ROOM_UNAVAILABLE_MESSAGE.to_string()
        ))
    );
    assert_eq!(backend.creates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_history_with_empty_room_id_makes_no_request() {
    // テスト項目: 空のルーム ID では通信せずに InvalidInput になる
    // given (前提条件):
    let backend = Arc::new(Backend::new());
    let gateway = gateway_for(start_backend(backend.clone()).await);

    // when (操作):
    let result = gateway.fetch_message_history("").await;

    // then (期待する結果):
    assert!(matches!(result, Err(ChatError::InvalidInput(_))));
    assert_eq!(backend.history_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_history_skips_malformed_entries() {
    // テスト項目: 履歴の不正なエントリは除外され、正しいエントリのみ返される
    // given (前提条件):
    let backend = Arc::new(Backend {
        history_body: json!({"messages": [
            {"sender": "bob", "message": "hey", "timestamp": "T1"},
            {"sender": "bob"},
            {"sender": "carol", "roomId": "room1", "message": "hi bob", "timestamp": "T2"}
        ]}),
        ..Backend::new()
    });
    let gateway = gateway_for(start_backend(backend.clone()).await);

    // when (操作):
    let messages = gateway.fetch_message_history("room1").await.unwrap();

    // then (期待する結果):
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender.as_str(), "bob");
    assert_eq!(messages[0].room_id.as_str(), "room1");
    assert_eq!(messages[1].message, "hi bob");
}

#[tokio::test]
async fn test_history_non_success_status_is_reported() {
    // テスト項目: 履歴取得が失敗ステータスの場合、そのステータスを持つエラーになる
    // given (前提条件):
    let backend = Arc::new(Backend {
        history_status: StatusCode::SERVICE_UNAVAILABLE,
        ..Backend::new()
    });
    let gateway = gateway_for(start_backend(backend.clone()).await);

    // when (操作):
    let result = gateway.fetch_message_history("room1").await;

    // then (期待する結果):
    assert_eq!(result, Err(ChatError::HistoryFetchFailed { status: 503 }));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // テスト項目: バックエンドに接続できない場合、TransportError になる
    // given (前提条件):
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let gateway = gateway_for(addr);

    // when (操作):
    let lookup = gateway.check_or_create_room("room1").await;
    let history = gateway.fetch_message_history("room1").await;

    // then (期待する結果):
    assert!(matches!(lookup, Err(ChatError::TransportError(_))));
    assert!(matches!(history, Err(ChatError::TransportError(_))));
}
