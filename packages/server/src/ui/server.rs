//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::usecase::{CheckRoomUseCase, GetMessagesUseCase};

use super::{
    handler::{check_room, get_messages, health_check},
    signal::shutdown_signal,
    state::AppState,
};

/// HTTP front for the room gateway
///
/// # Example
///
/// ```ignore
/// let server = Server::new(check_room_usecase, get_messages_usecase);
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    /// CheckRoomUseCase（ルーム確認・作成のユースケース）
    check_room_usecase: Arc<CheckRoomUseCase>,
    /// GetMessagesUseCase（履歴取得のユースケース）
    get_messages_usecase: Arc<GetMessagesUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        check_room_usecase: Arc<CheckRoomUseCase>,
        get_messages_usecase: Arc<GetMessagesUseCase>,
    ) -> Self {
        Self {
            check_room_usecase,
            get_messages_usecase,
        }
    }

    /// Build the router without binding a socket
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            check_room_usecase: self.check_room_usecase,
            get_messages_usecase: self.get_messages_usecase,
        });

        Router::new()
            .route("/api/health", get(health_check))
            .route("/api/check-room", post(check_room))
            .route("/api/get-messages", get(get_messages))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the HTTP server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("roomchat server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
