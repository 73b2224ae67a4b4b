//! In-memory broker transport for tests.
//!
//! Every `open()` hands the test a `FakeBroker` playing the broker side of
//! that one connection.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use futures_util::{sink, stream};
use roomchat_server::domain::ChatError;
use tokio::sync::mpsc;

use super::{BrokerTransport, Command, Frame, FrameSink, FrameStream};

const EXPECT_TIMEOUT: Duration = Duration::from_secs(2);

pub(crate) struct FakeTransport {
    connections: mpsc::UnboundedSender<FakeBroker>,
    refuse_next: AtomicUsize,
    pub(crate) opened: AtomicUsize,
}

impl FakeTransport {
    pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<FakeBroker>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            connections: tx,
            refuse_next: AtomicUsize::new(0),
            opened: AtomicUsize::new(0),
        });
        (transport, rx)
    }

    /// Fail the next `count` connection attempts
    pub(crate) fn refuse_next(&self, count: usize) {
        self.refuse_next.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl BrokerTransport for FakeTransport {
    fn virtual_host(&self) -> String {
        "fake-broker".to_string()
    }

    async fn open(&self) -> Result<(FrameSink, FrameStream), ChatError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let refused = self
            .refuse_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return Err(ChatError::TransportError("connection refused".to_string()));
        }

        let (client_tx, from_client) = mpsc::unbounded_channel::<Frame>();
        let (to_client, client_rx) = mpsc::unbounded_channel::<Result<Frame, ChatError>>();

        let frame_sink = sink::unfold(client_tx, |tx, frame: Frame| async move {
            tx.send(frame)
                .map_err(|_| ChatError::TransportError("broker gone".to_string()))?;
            Ok::<_, ChatError>(tx)
        });
        let frame_stream = stream::unfold(client_rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });

        self.connections
            .send(FakeBroker {
                to_client,
                from_client,
            })
            .map_err(|_| ChatError::TransportError("test finished".to_string()))?;

        Ok((Box::pin(frame_sink), Box::pin(frame_stream)))
    }
}

/// Broker side of one fake connection
pub(crate) struct FakeBroker {
    to_client: mpsc::UnboundedSender<Result<Frame, ChatError>>,
    from_client: mpsc::UnboundedReceiver<Frame>,
}

impl FakeBroker {
    /// Wait for the next frame sent by the client
    pub(crate) async fn expect_frame(&mut self) -> Frame {
        tokio::time::timeout(EXPECT_TIMEOUT, self.from_client.recv())
            .await
            .expect("timed out waiting for a client frame")
            .expect("client closed the connection")
    }

    /// Whether the client sends nothing more within `window`
    pub(crate) async fn stays_silent(&mut self, window: Duration) -> bool {
        tokio::time::timeout(window, self.from_client.recv())
            .await
            .is_err()
    }

    pub(crate) fn reply(&self, frame: Frame) {
        let _ = self.to_client.send(Ok(frame));
    }

    pub(crate) fn fail(&self, error: ChatError) {
        let _ = self.to_client.send(Err(error));
    }

    /// Play the CONNECT / CONNECTED / SUBSCRIBE handshake and return the SUBSCRIBE frame
    pub(crate) async fn accept(&mut self) -> Frame {
        let connect = self.expect_frame().await;
        assert_eq!(connect.command, Command::Connect);
        self.reply(Frame::new(Command::Connected).with_header("version", "1.2"));

        let subscribe = self.expect_frame().await;
        assert_eq!(subscribe.command, Command::Subscribe);
        subscribe
    }

    /// Deliver a MESSAGE on the given subscription
    pub(crate) fn deliver(&self, subscription: &str, body: &str) {
        self.reply(
            Frame::new(Command::Message)
                .with_header("subscription", subscription)
                .with_header("message-id", "m-1")
                .with_header("destination", "/topic/room/room1")
                .with_body(body),
        );
    }
}
