//! Terminal chat client.
//!
//! Joins (or creates) a room through the backend, loads its history and then
//! chats live over STOMP on WebSocket. Username and room id are prompted for
//! when not given on the command line. Press Ctrl+C or Ctrl+D to leave.
//!
//! Run with:
//! ```not_rust
//! BACKEND_URL=http://localhost:8080 cargo run --bin roomchat-client
//! cargo run --bin roomchat-client -- -u alice -r room1 --backend-url http://localhost:8080
//! ```

use std::time::Duration;

use clap::Parser;
use roomchat_client::runner::{ClientOptions, run_client};
use roomchat_shared::{
    config::{BACKEND_URL_ENV, BackendConfig},
    logger::setup_logger,
};

#[derive(Parser, Debug)]
#[command(name = "roomchat-client")]
#[command(about = "Terminal chat client joining a room over STOMP/WebSocket", long_about = None)]
struct Args {
    /// Username shown on your messages
    #[arg(short = 'u', long)]
    username: Option<String>,

    /// Room to join (created when missing)
    #[arg(short = 'r', long)]
    room_id: Option<String>,

    /// Base URL of the chat backend
    #[arg(short = 'b', long, env = BACKEND_URL_ENV)]
    backend_url: String,

    /// Seconds to wait before reconnecting to the broker
    #[arg(long, default_value = "5")]
    reconnect_delay_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let backend = match BackendConfig::parse(&args.backend_url) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut options = ClientOptions::new(backend);
    options.username = args.username;
    options.room_id = args.room_id;
    options.reconnect_delay = Duration::from_secs(args.reconnect_delay_secs);

    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
