//! Broker transport.
//!
//! A transport opens one connection to the broker and hands back the two
//! halves: a sink of outgoing frames and a stream of incoming frames. Codec
//! failures surface as `ProtocolError` items (the connection stays usable);
//! anything else ends the connection with `TransportError`.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Sink, SinkExt, Stream, StreamExt, future};
use roomchat_server::domain::ChatError;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use super::frame::Frame;

pub type FrameSink = Pin<Box<dyn Sink<Frame, Error = ChatError> + Send>>;
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Frame, ChatError>> + Send>>;

#[async_trait]
pub trait BrokerTransport: Send + Sync {
    /// Value of the `host` header sent with `CONNECT`
    fn virtual_host(&self) -> String;

    /// Open a new connection
    async fn open(&self) -> Result<(FrameSink, FrameStream), ChatError>;
}

/// STOMP frames carried in WebSocket text messages
pub struct WebSocketTransport {
    url: Url,
}

impl WebSocketTransport {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

#[async_trait]
impl BrokerTransport for WebSocketTransport {
    fn virtual_host(&self) -> String {
        self.url.host_str().unwrap_or("localhost").to_string()
    }

    async fn open(&self) -> Result<(FrameSink, FrameStream), ChatError> {
        let (ws_stream, response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ChatError::TransportError(e.to_string()))?;
        tracing::debug!(
            "WebSocket handshake with {} answered {}",
            self.url,
            response.status()
        );

        let (write, read) = ws_stream.split();

        let sink = write
            .sink_map_err(|e| ChatError::TransportError(e.to_string()))
            .with(|frame: Frame| {
                future::ready(Ok::<_, ChatError>(Message::Text(frame.encode().into())))
            });

        let stream = read.filter_map(|message| future::ready(decode_message(message)));

        Ok((Box::pin(sink), Box::pin(stream)))
    }
}

fn decode_message(
    message: Result<Message, tokio_tungstenite::tungstenite::Error>,
) -> Option<Result<Frame, ChatError>> {
    match message {
        Ok(Message::Text(text)) => decode_text(text.as_str()),
        Ok(Message::Binary(data)) => match std::str::from_utf8(&data) {
            Ok(text) => decode_text(text),
            Err(_) => Some(Err(ChatError::ProtocolError(format!(
                "received {} bytes of non UTF-8 data",
                data.len()
            )))),
        },
        Ok(Message::Close(_)) => Some(Err(ChatError::TransportError(
            "broker closed the connection".to_string(),
        ))),
        Ok(_) => None,
        Err(e) => Some(Err(ChatError::TransportError(e.to_string()))),
    }
}

fn decode_text(text: &str) -> Option<Result<Frame, ChatError>> {
    match Frame::decode(text) {
        Ok(Some(frame)) => Some(Ok(frame)),
        Ok(None) => None,
        Err(e) => Some(Err(ChatError::ProtocolError(e.to_string()))),
    }
}
