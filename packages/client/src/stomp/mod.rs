//! STOMP over WebSocket.

mod frame;
mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use frame::{Command, Frame, FrameError};
pub use transport::{BrokerTransport, FrameSink, FrameStream, WebSocketTransport};
