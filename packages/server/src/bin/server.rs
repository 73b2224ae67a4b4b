//! HTTP front for the roomchat backend gateway.
//!
//! Exposes `/api/check-room` and `/api/get-messages`, forwarding to the
//! external chat backend configured by `--backend-url` / `BACKEND_URL`.
//!
//! Run with:
//! ```not_rust
//! BACKEND_URL=http://localhost:8080 cargo run --bin roomchat-server
//! cargo run --bin roomchat-server -- --port 4000 --backend-url http://localhost:8080
//! ```

use std::sync::Arc;

use clap::Parser;
use roomchat_server::{
    domain::RoomGateway,
    infrastructure::gateway::HttpRoomGateway,
    ui::Server,
    usecase::{CheckRoomUseCase, GetMessagesUseCase},
};
use roomchat_shared::{
    config::{BACKEND_URL_ENV, BackendConfig},
    logger::setup_logger,
};

#[derive(Parser, Debug)]
#[command(name = "roomchat-server")]
#[command(about = "HTTP front for the roomchat backend gateway", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,

    /// Base URL of the chat backend
    #[arg(short = 'b', long, env = BACKEND_URL_ENV)]
    backend_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Config
    // 2. Gateway
    // 3. UseCases
    // 4. Server
    let config = match BackendConfig::parse(&args.backend_url) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Using backend {}", config.base_url());

    let gateway: Arc<dyn RoomGateway> = match HttpRoomGateway::new(config) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let check_room_usecase = Arc::new(CheckRoomUseCase::new(gateway.clone()));
    let get_messages_usecase = Arc::new(GetMessagesUseCase::new(gateway));

    let server = Server::new(check_room_usecase, get_messages_usecase);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
