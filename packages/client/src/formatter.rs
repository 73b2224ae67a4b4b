//! Message formatting utilities for client display.

use roomchat_server::domain::{ChatError, ChatMessage, Username};
use roomchat_shared::time::format_clock_time;

use crate::session::ConnectionState;

const RULE: &str = "============================================================";

/// Own messages are pushed towards the right edge by this much
const OWN_MESSAGE_INDENT: &str = "                        ";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the top bar of the chat screen
    pub fn format_header(room_id: &str, username: &str) -> String {
        format!("\n{}\nRoom: {} | User: {}\n{}\n", RULE, room_id, username, RULE)
    }

    /// Format the line shown above the first message
    pub fn format_welcome(room_id: &str, username: &str) -> String {
        format!(
            "Welcome to the chat, {}! Start messaging in room {}.\n",
            username, room_id
        )
    }

    /// Format one chat message
    ///
    /// # Arguments
    ///
    /// * `message` - The message to show
    /// * `me` - The local user; their messages are marked and indented
    ///
    /// # Returns
    ///
    /// A block of three lines: sender, body, `HH:MM`
    pub fn format_chat_message(message: &ChatMessage, me: &Username) -> String {
        let (indent, me_suffix) = if message.is_from(me) {
            (OWN_MESSAGE_INDENT, " (me)")
        } else {
            ("", "")
        };

        let mut output = String::new();
        output.push_str(&format!("\n{}@{}{}\n", indent, message.sender, me_suffix));
        for line in message.message.lines() {
            output.push_str(&format!("{}{}\n", indent, line));
        }
        output.push_str(&format!(
            "{}{}\n",
            indent,
            Self::format_time(&message.timestamp)
        ));
        output
    }

    /// `HH:MM` in local time, or the raw timestamp if it is not ISO-8601
    pub fn format_time(timestamp: &str) -> String {
        format_clock_time(timestamp).unwrap_or_else(|| timestamp.to_string())
    }

    /// Format a connection state change
    pub fn format_connection(state: ConnectionState) -> String {
        match state {
            ConnectionState::Connected => "* Connected\n".to_string(),
            ConnectionState::Connecting => "* Connecting...\n".to_string(),
            ConnectionState::Disconnected => "* Disconnected\n".to_string(),
        }
    }

    /// Format an error for the user
    pub fn format_error(error: &ChatError) -> String {
        format!("! {}\n", error.user_message())
    }
}
