//! Chat screen: owns the view, the history fetch and the live session of one
//! joined room.
//!
//! Both producers (history task, session) push onto a single channel and the
//! screen is its only consumer, so the view is only ever mutated here.

use std::{sync::Arc, time::Duration};

use roomchat_server::domain::RoomGateway;
use roomchat_shared::time::Clock;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    join::JoinTicket,
    session::{ConnectionState, LiveSession, SessionConfig},
    stomp::BrokerTransport,
    view::{ChatView, ViewChange, ViewEvent},
};

pub struct ChatScreen {
    ticket: JoinTicket,
    view: ChatView,
    events: mpsc::UnboundedReceiver<ViewEvent>,
    session: Option<LiveSession>,
    history: Option<JoinHandle<()>>,
    closed: bool,
}

impl ChatScreen {
    /// Open the screen: fetch history once and connect to the broker
    pub fn open(
        ticket: JoinTicket,
        gateway: Arc<dyn RoomGateway>,
        transport: Arc<dyn BrokerTransport>,
        clock: Arc<dyn Clock>,
        reconnect_delay: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let history = tokio::spawn({
            let events = events_tx.clone();
            let room_id = ticket.room_id.clone();
            async move {
                let event = match gateway.fetch_message_history(room_id.as_str()).await {
                    Ok(messages) => {
                        tracing::info!(
                            "Loaded {} message(s) of history for room '{}'",
                            messages.len(),
                            room_id
                        );
                        ViewEvent::History(messages)
                    }
                    Err(e) => {
                        tracing::error!("Error fetching messages: {}", e);
                        ViewEvent::HistoryFailed(e)
                    }
                };
                let _ = events.send(event);
            }
        });

        let config = SessionConfig::new(ticket.username.clone(), ticket.room_id.clone())
            .with_reconnect_delay(reconnect_delay);
        let session = LiveSession::activate(transport, config, clock, events_tx);

        Self {
            ticket,
            view: ChatView::new(),
            events: events_rx,
            session: Some(session),
            history: Some(history),
            closed: false,
        }
    }

    pub fn ticket(&self) -> &JoinTicket {
        &self.ticket
    }

    pub fn view(&self) -> &ChatView {
        &self.view
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.session
            .as_ref()
            .map(LiveSession::state)
            .unwrap_or(ConnectionState::Disconnected)
    }

    /// Wait for the next event and apply it
    ///
    /// Returns `None` once the screen is closed or both producers are gone.
    pub async fn next_change(&mut self) -> Option<ViewChange> {
        if self.closed {
            return None;
        }
        let event = self.events.recv().await?;
        Some(self.apply(event))
    }

    /// Apply one event to the view; ignored after `close()`
    pub fn apply(&mut self, event: ViewEvent) -> ViewChange {
        if self.closed {
            tracing::debug!("Screen closed, ignoring {:?}", event);
            return ViewChange::default();
        }
        self.view.apply(event)
    }

    pub fn send_message(&self, body: &str) -> bool {
        match &self.session {
            Some(session) if !self.closed => session.send_message(body),
            _ => false,
        }
    }

    /// Release everything the screen holds
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Some(history) = self.history.take() {
            history.abort();
        }
        if let Some(session) = self.session.take() {
            session.deactivate().await;
        }
        self.events.close();
        tracing::info!("Left room '{}'", self.ticket.room_id);
    }
}

impl Drop for ChatScreen {
    fn drop(&mut self) {
        if let Some(history) = self.history.take() {
            history.abort();
        }
        // dropping the session signals its task to stop
        self.session.take();
    }
}
