//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::channel::mpsc;
use futures::StreamExt;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use socialhub_core::config::RealtimeConfig;
use socialhub_core::types::UserId;
use socialhub_realtime::RealtimeEngine;
use socialhub_store::{MemoryNotificationStore, MemoryRoomDirectory, MemoryUserDirectory};

/// How long a test waits for an expected frame.
const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

/// Engine plus direct access to its in-memory collaborators.
pub struct TestHub {
    pub engine: RealtimeEngine,
    pub users: Arc<MemoryUserDirectory>,
    pub store: Arc<MemoryNotificationStore>,
}

impl TestHub {
    pub fn new() -> Self {
        Self::with_config(RealtimeConfig::default())
    }

    pub fn with_config(config: RealtimeConfig) -> Self {
        let users = Arc::new(MemoryUserDirectory::new());
        let store = Arc::new(MemoryNotificationStore::new());
        let engine = RealtimeEngine::new(
            config,
            users.clone(),
            store.clone(),
            Arc::new(MemoryRoomDirectory::new()),
        );
        Self {
            engine,
            users,
            store,
        }
    }

    /// Opens a served session for `user_id` and waits until it is
    /// registered.
    pub async fn connect(&self, user_id: UserId) -> TestSession {
        let (inbound_tx, inbound_rx) = mpsc::unbounded::<Result<Bytes, String>>();
        let (outbound_tx, outbound_rx) = mpsc::unbounded::<Bytes>();

        let engine = self.engine.clone();
        let task = tokio::spawn(async move {
            engine
                .serve_connection(user_id, inbound_rx, outbound_tx)
                .await;
        });

        let mut session = TestSession {
            user_id,
            inbound: inbound_tx,
            outbound: outbound_rx,
            task,
        };
        // The read pump only runs once the client is registered.
        session.send(json!({"type": "ping"}));
        session.expect("pong").await;
        session
    }
}

/// Client side of one served connection.
pub struct TestSession {
    pub user_id: UserId,
    inbound: mpsc::UnboundedSender<Result<Bytes, String>>,
    outbound: mpsc::UnboundedReceiver<Bytes>,
    task: JoinHandle<()>,
}

impl TestSession {
    pub fn send(&self, frame: Value) {
        self.send_raw(frame.to_string().as_bytes());
    }

    pub fn send_raw(&self, raw: &[u8]) {
        self.inbound
            .unbounded_send(Ok(Bytes::copy_from_slice(raw)))
            .expect("session still open");
    }

    /// Next outbound frame.
    pub async fn next(&mut self) -> Value {
        let payload = tokio::time::timeout(FRAME_TIMEOUT, self.outbound.next())
            .await
            .expect("timed out waiting for frame")
            .expect("session closed");
        serde_json::from_slice(&payload).expect("frame is JSON")
    }

    /// Next frame, which must have the given type.
    pub async fn expect(&mut self, frame_type: &str) -> Value {
        let frame = self.next().await;
        assert_eq!(frame["type"], frame_type, "unexpected frame {frame}");
        frame
    }

    /// Skips frames until one of the given type arrives.
    pub async fn wait_for(&mut self, frame_type: &str) -> Value {
        loop {
            let frame = self.next().await;
            if frame["type"] == frame_type {
                return frame;
            }
        }
    }

    /// Round-trips a ping and returns every frame received before the pong.
    pub async fn drain(&mut self) -> Vec<Value> {
        self.send(json!({"type": "ping"}));
        let mut frames = Vec::new();
        loop {
            let frame = self.next().await;
            if frame["type"] == "pong" {
                return frames;
            }
            frames.push(frame);
        }
    }

    /// Closes the transport and waits for the session to unregister.
    pub async fn close(self) {
        drop(self.inbound);
        tokio::time::timeout(FRAME_TIMEOUT, self.task)
            .await
            .expect("session did not end")
            .expect("session task panicked");
    }
}
