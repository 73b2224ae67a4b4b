//! Client execution logic: join screen, then chat screen.

use std::{sync::Arc, time::Duration};

use roomchat_server::{domain::RoomGateway, infrastructure::gateway::HttpRoomGateway};
use roomchat_shared::{config::BackendConfig, time::SystemClock};

use crate::{
    error::ClientError,
    formatter::MessageFormatter,
    join::{JoinTicket, RoomNegotiation},
    screen::ChatScreen,
    session::DEFAULT_RECONNECT_DELAY,
    stomp::{BrokerTransport, WebSocketTransport},
    ui::{prompt_join, redisplay_prompt, spawn_input_thread},
    view::ViewChange,
};

/// Startup options of the client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub backend: BackendConfig,
    /// Prompted for when absent
    pub username: Option<String>,
    /// Prompted for when absent
    pub room_id: Option<String>,
    pub reconnect_delay: Duration,
}

impl ClientOptions {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            backend,
            username: None,
            room_id: None,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

enum Step {
    Input(Option<String>),
    Change(Option<ViewChange>),
}

/// Run the client until the user leaves
pub async fn run_client(options: ClientOptions) -> Result<(), ClientError> {
    let gateway: Arc<dyn RoomGateway> = Arc::new(HttpRoomGateway::new(options.backend.clone())?);
    let transport: Arc<dyn BrokerTransport> = Arc::new(WebSocketTransport::new(
        options.backend.broker_url().clone(),
    ));
    tracing::info!(
        "Using backend {} (broker {})",
        options.backend.base_url(),
        options.backend.broker_url()
    );

    let ticket = match join_room(gateway.clone(), options.username, options.room_id).await? {
        Some(ticket) => ticket,
        None => {
            tracing::info!("Join cancelled");
            return Ok(());
        }
    };

    let mut screen = ChatScreen::open(
        ticket,
        gateway,
        transport,
        Arc::new(SystemClock),
        options.reconnect_delay,
    );
    chat(&mut screen).await;
    screen.close().await;

    Ok(())
}

/// Join screen loop: prompt, negotiate, show the failure and ask again
async fn join_room(
    gateway: Arc<dyn RoomGateway>,
    mut username: Option<String>,
    mut room_id: Option<String>,
) -> Result<Option<JoinTicket>, ClientError> {
    let mut negotiation = RoomNegotiation::new(gateway);

    loop {
        let form = match prompt_join(username.take(), room_id.take()).await? {
            Some(form) => form,
            None => return Ok(None),
        };

        match negotiation.submit(&form.username, &form.room_id).await {
            Ok(ticket) => {
                tracing::debug!("Joining with {}", ticket.to_query());
                return Ok(Some(ticket));
            }
            Err(e) => {
                print!("{}", MessageFormatter::format_error(&e));
                negotiation.acknowledge();
            }
        }
    }
}

async fn chat(screen: &mut ChatScreen) {
    let username = screen.ticket().username.clone();
    let room_id = screen.ticket().room_id.clone();

    print!(
        "{}",
        MessageFormatter::format_header(room_id.as_str(), username.as_str())
    );
    print!(
        "{}",
        MessageFormatter::format_welcome(room_id.as_str(), username.as_str())
    );
    println!("Type messages and press Enter to send. Press Ctrl+C to exit.\n");

    let mut input = spawn_input_thread(username.to_string());

    loop {
        let step = tokio::select! {
            line = input.recv() => Step::Input(line),
            change = screen.next_change() => Step::Change(change),
        };

        match step {
            Step::Input(Some(line)) => {
                if !line.trim().is_empty() && !screen.send_message(&line) {
                    print!(
                        "{}",
                        MessageFormatter::format_connection(screen.connection_state())
                    );
                    redisplay_prompt(username.as_str());
                }
            }
            Step::Input(None) => break,
            Step::Change(Some(change)) => {
                if change.is_empty() {
                    continue;
                }
                if let Some(state) = change.connection {
                    print!("{}", MessageFormatter::format_connection(state));
                }
                for message in screen.view().newest(change.appended) {
                    print!(
                        "{}",
                        MessageFormatter::format_chat_message(message, &username)
                    );
                }
                redisplay_prompt(username.as_str());
            }
            Step::Change(None) => break,
        }
    }
}
