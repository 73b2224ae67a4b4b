//! Request handlers.

mod http;

pub use http::{check_room, get_messages, health_check};
