//! Chat view state.
//!
//! An append-only list of messages for the active room. History and live
//! messages are merged in the order they arrive; an exact copy of a message
//! already shown is never shown twice.

use std::collections::HashSet;

use roomchat_server::domain::{ChatError, ChatMessage, entity::MessageKey};

use crate::session::ConnectionState;

/// Everything that can change what the chat screen shows
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Result of the one-time history fetch
    History(Vec<ChatMessage>),
    /// The history fetch failed; live messages keep flowing
    HistoryFailed(ChatError),
    /// A message delivered on the room topic
    Inbound(ChatMessage),
    Connection(ConnectionState),
    BrokerError { message: String, details: String },
}

/// What applying an event changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewChange {
    /// Number of messages newly appended (they are the last `appended` ones)
    pub appended: usize,
    pub connection: Option<ConnectionState>,
}

impl ViewChange {
    pub fn is_empty(&self) -> bool {
        self.appended == 0 && self.connection.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ChatView {
    messages: Vec<ChatMessage>,
    seen: HashSet<MessageKey>,
    connection: ConnectionState,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            seen: HashSet::new(),
            connection: ConnectionState::Disconnected,
        }
    }

    /// Append a message unless an identical one is already shown
    pub fn append(&mut self, message: ChatMessage) -> bool {
        if !self.seen.insert(message.key()) {
            tracing::debug!(
                "Skipping duplicate message from '{}' at {}",
                message.sender,
                message.timestamp
            );
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn apply(&mut self, event: ViewEvent) -> ViewChange {
        let mut change = ViewChange::default();
        match event {
            ViewEvent::History(messages) => {
                for message in messages {
                    if self.append(message) {
                        change.appended += 1;
                    }
                }
            }
            ViewEvent::Inbound(message) => {
                if self.append(message) {
                    change.appended = 1;
                }
            }
            ViewEvent::Connection(state) => {
                if self.connection != state {
                    self.connection = state;
                    change.connection = Some(state);
                }
            }
            // 履歴取得の失敗とブローカーのエラーはログのみ（表示内容は変わらない）
            ViewEvent::HistoryFailed(_) | ViewEvent::BrokerError { .. } => {}
        }
        change
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// The last `count` messages, oldest first
    pub fn newest(&self, count: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }
}
