//! Live session: one broker connection per open chat screen.
//!
//! The connection runs in its own task and talks to the rest of the client
//! through channels only:
//!
//! - inbound messages, connection changes and broker errors are pushed onto
//!   the screen's `ViewEvent` channel (single consumer, arrival order kept)
//! - outgoing message bodies go through an outbound queue
//! - teardown is a oneshot signal; dropping the session sends it too
//!
//! ```text
//! Disconnected ──activate──▶ Connecting ──CONNECTED + SUBSCRIBE──▶ Connected
//!                               ▲   │                                 │
//!                               └───┘ retry after delay               │ transport lost
//!                               ▲                                     │
//!                               └─────────────────────────────────────┘
//! any state ──deactivate──▶ Disconnected
//! ```

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use roomchat_server::{
    domain::{ChatError, ChatMessage, RoomId, Username},
    infrastructure::dto::{conversion::parse_message_text, message::ChatMessageDto},
};
use roomchat_shared::time::Clock;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

use crate::{
    stomp::{BrokerTransport, Command, Frame, FrameSink, FrameStream},
    view::ViewEvent,
};

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// The session's only subscription
const SUBSCRIPTION_ID: &str = "sub-0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Who is chatting where, and how to recover from a lost connection
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub username: Username,
    pub room_id: RoomId,
    pub reconnect_delay: Duration,
}

impl SessionConfig {
    pub fn new(username: Username, room_id: RoomId) -> Self {
        Self {
            username,
            room_id,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }

    pub fn with_reconnect_delay(mut self, reconnect_delay: Duration) -> Self {
        self.reconnect_delay = reconnect_delay;
        self
    }

    /// Topic carrying the room's messages
    pub fn topic(&self) -> String {
        format!("/topic/room/{}", self.room_id)
    }

    /// Destination accepting the room's outgoing messages
    pub fn destination(&self) -> String {
        format!("/app/send-message/{}", self.room_id)
    }
}

/// Handle to a running session
pub struct LiveSession {
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    state: watch::Receiver<ConnectionState>,
    outbound: mpsc::UnboundedSender<String>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl LiveSession {
    /// Start connecting in the background
    ///
    /// # Arguments
    ///
    /// * `transport` - How to reach the broker
    /// * `config` - Username, room and reconnect policy
    /// * `clock` - Source of outgoing message timestamps
    /// * `events` - Channel the screen consumes
    pub fn activate(
        transport: Arc<dyn BrokerTransport>,
        config: SessionConfig,
        clock: Arc<dyn Clock>,
        events: mpsc::UnboundedSender<ViewEvent>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = ConnectionWorker {
            transport,
            config: config.clone(),
            state: state_tx,
            events,
            outbound: outbound_rx,
            shutdown: shutdown_rx,
        };
        let task = tokio::spawn(worker.run());

        tracing::info!(
            "Session activated for '{}' in room '{}'",
            config.username,
            config.room_id
        );

        Self {
            config,
            clock,
            state: state_rx,
            outbound: outbound_tx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Wait until the connection reaches `target`
    ///
    /// Returns `false` if the session ended first.
    pub async fn wait_for_state(&self, target: ConnectionState) -> bool {
        let mut state = self.state.clone();
        state.wait_for(|current| *current == target).await.is_ok()
    }

    /// Publish a message to the room
    ///
    /// No-op (returns `false`) for an empty or whitespace-only body, or while
    /// not connected. The message is not appended locally; it shows up once
    /// the broker echoes it back on the room topic.
    pub fn send_message(&self, body: &str) -> bool {
        if body.trim().is_empty() {
            return false;
        }
        if self.state() != ConnectionState::Connected {
            tracing::debug!("Not connected, message not sent");
            return false;
        }

        let message = ChatMessage::new(
            self.config.username.clone(),
            self.config.room_id.clone(),
            body.to_string(),
            self.clock.now_iso8601(),
        );
        let payload = match serde_json::to_string(&ChatMessageDto::from(message)) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize message: {}", e);
                return false;
            }
        };

        self.outbound.send(payload).is_ok()
    }

    /// Unsubscribe, disconnect and wait for the connection task to finish
    pub async fn deactivate(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!("Session task ended abnormally: {}", e);
        }
        tracing::info!("Session for room '{}' deactivated", self.config.room_id);
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// What woke the connection loop up
enum Step {
    Shutdown,
    Publish(String),
    Inbound(Option<Result<Frame, ChatError>>),
}

struct ConnectionWorker {
    transport: Arc<dyn BrokerTransport>,
    config: SessionConfig,
    state: watch::Sender<ConnectionState>,
    events: mpsc::UnboundedSender<ViewEvent>,
    outbound: mpsc::UnboundedReceiver<String>,
    shutdown: oneshot::Receiver<()>,
}

impl ConnectionWorker {
    async fn run(mut self) {
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;
            self.set_state(ConnectionState::Connecting);
            tracing::info!("Connecting to broker (attempt {})", attempt);

            match self.run_connection().await {
                Ok(()) => break,
                Err(e) => {
                    tracing::warn!("Connection lost: {}", e);
                    // stop accepting messages before draining what was queued
                    self.set_state(ConnectionState::Connecting);
                    self.discard_pending();
                }
            }

            tracing::info!("Reconnecting in {:?}", self.config.reconnect_delay);
            let stop = tokio::select! {
                _ = &mut self.shutdown => true,
                _ = tokio::time::sleep(self.config.reconnect_delay) => false,
            };
            if stop {
                break;
            }
        }

        self.set_state(ConnectionState::Disconnected);
        tracing::debug!("Connection task finished");
    }

    /// One connection attempt; `Ok(())` means teardown was requested
    async fn run_connection(&mut self) -> Result<(), ChatError> {
        let opened = tokio::select! {
            _ = &mut self.shutdown => None,
            opened = self.transport.open() => Some(opened),
        };
        let (mut sink, mut stream) = match opened {
            Some(opened) => opened?,
            None => return Ok(()),
        };

        sink.send(Frame::connect(&self.transport.virtual_host()))
            .await?;
        if !self.await_connected(&mut sink, &mut stream).await? {
            return Ok(());
        }

        let topic = self.config.topic();
        sink.send(Frame::subscribe(SUBSCRIPTION_ID, &topic)).await?;
        self.set_state(ConnectionState::Connected);
        tracing::info!("Subscribed to {}", topic);

        let destination = self.config.destination();
        loop {
            let step = tokio::select! {
                _ = &mut self.shutdown => Step::Shutdown,
                Some(body) = self.outbound.recv() => Step::Publish(body),
                frame = stream.next() => Step::Inbound(frame),
            };

            match step {
                Step::Shutdown => {
                    close_gracefully(&mut sink).await;
                    return Ok(());
                }
                Step::Publish(body) => {
                    sink.send(Frame::send(&destination, &body)).await?;
                    tracing::debug!("Published to {}", destination);
                }
                Step::Inbound(Some(Ok(frame))) => self.handle_frame(frame),
                Step::Inbound(Some(Err(ChatError::ProtocolError(reason)))) => {
                    tracing::warn!("Ignoring unreadable frame: {}", reason);
                }
                Step::Inbound(Some(Err(e))) => return Err(e),
                Step::Inbound(None) => {
                    return Err(ChatError::TransportError(
                        "connection closed by broker".to_string(),
                    ));
                }
            }
        }
    }

    /// Wait for CONNECTED; `Ok(false)` means teardown was requested meanwhile
    async fn await_connected(
        &mut self,
        sink: &mut FrameSink,
        stream: &mut FrameStream,
    ) -> Result<bool, ChatError> {
        loop {
            let step = tokio::select! {
                _ = &mut self.shutdown => Step::Shutdown,
                frame = stream.next() => Step::Inbound(frame),
            };

            match step {
                Step::Shutdown => {
                    let _ = sink.close().await;
                    return Ok(false);
                }
                Step::Inbound(Some(Ok(frame))) => match frame.command {
                    Command::Connected => {
                        tracing::debug!(
                            "Broker accepted STOMP version {}",
                            frame.header("version").unwrap_or("1.0")
                        );
                        return Ok(true);
                    }
                    Command::Error => {
                        let reason = self.report_broker_error(&frame);
                        return Err(ChatError::ProtocolError(reason));
                    }
                    other => {
                        tracing::debug!("Ignoring {} before CONNECTED", other.as_str());
                    }
                },
                Step::Inbound(Some(Err(e))) => return Err(e),
                Step::Inbound(None) => {
                    return Err(ChatError::TransportError(
                        "connection closed during handshake".to_string(),
                    ));
                }
                Step::Publish(_) => {}
            }
        }
    }

    fn handle_frame(&self, frame: Frame) {
        match frame.command {
            Command::Message => {
                if let Some(subscription) = frame.header("subscription")
                    && subscription != SUBSCRIPTION_ID
                {
                    tracing::debug!("Ignoring message for subscription {}", subscription);
                    return;
                }
                let Some(message) = parse_message_text(&frame.body, &self.config.room_id) else {
                    return;
                };
                if message.room_id != self.config.room_id {
                    tracing::warn!(
                        "Quarantining message for room '{}' delivered on room '{}'",
                        message.room_id,
                        self.config.room_id
                    );
                    return;
                }
                self.emit(ViewEvent::Inbound(message));
            }
            Command::Error => {
                self.report_broker_error(&frame);
            }
            other => {
                tracing::debug!("Ignoring {} frame", other.as_str());
            }
        }
    }

    /// Log an ERROR frame and forward it to the screen; the session stays up
    fn report_broker_error(&self, frame: &Frame) -> String {
        let message = frame.header("message").unwrap_or("unknown error").to_string();
        tracing::error!("Broker error: {}", message);
        if !frame.body.is_empty() {
            tracing::error!("Details: {}", frame.body);
        }
        self.emit(ViewEvent::BrokerError {
            message: message.clone(),
            details: frame.body.clone(),
        });
        message
    }

    fn set_state(&self, next: ConnectionState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            self.emit(ViewEvent::Connection(next));
        }
    }

    fn emit(&self, event: ViewEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Screen is gone, dropping event");
        }
    }

    fn discard_pending(&mut self) {
        let mut dropped = 0;
        while self.outbound.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::warn!("Dropped {} unsent message(s) after losing the connection", dropped);
        }
    }
}

async fn close_gracefully(sink: &mut FrameSink) {
    let frames = [Frame::unsubscribe(SUBSCRIPTION_ID), Frame::disconnect()];
    for frame in frames {
        if let Err(e) = sink.send(frame).await {
            tracing::debug!("Could not say goodbye to the broker: {}", e);
            break;
        }
    }
    let _ = sink.close().await;
}
