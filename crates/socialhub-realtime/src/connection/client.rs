//! A single live connection of a user.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::types::{ClientId, UserId};

use crate::deadline;
use crate::hub::HubHandle;
use crate::message::{OutboundMessage, encode_outbound};

/// Result of a non-blocking enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The payload is in the queue.
    Queued,
    /// The queue is at capacity; the client must be evicted.
    Full,
    /// The client was closed.
    Closed,
}

/// One live connection.
///
/// Owns the sending half of a bounded FIFO queue whose receiver is drained
/// by the write pump, and a cancellation token that ends both pumps.
#[derive(Debug)]
pub struct Client {
    /// Unique connection ID
    pub id: ClientId,
    /// Owning user
    pub user_id: UserId,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<Bytes>,
    /// Monotonic reference point for activity tracking
    started: Instant,
    /// Milliseconds after `started` of the last inbound frame
    last_activity_ms: AtomicU64,
    cancel: CancellationToken,
    hub: HubHandle,
    call_timeout: Duration,
}

impl Client {
    /// Creates a client with a queue of `capacity` payloads.
    pub fn new(
        user_id: UserId,
        capacity: usize,
        hub: HubHandle,
        call_timeout: Duration,
    ) -> (Self, mpsc::Receiver<Bytes>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let client = Self {
            id: ClientId::new(),
            user_id,
            connected_at: Utc::now(),
            sender,
            started: Instant::now(),
            last_activity_ms: AtomicU64::new(0),
            cancel: CancellationToken::new(),
            hub,
            call_timeout,
        };
        (client, receiver)
    }

    /// Enqueues without blocking and reports what happened. Does not evict.
    pub fn try_enqueue(&self, payload: Bytes) -> EnqueueOutcome {
        if self.cancel.is_cancelled() {
            return EnqueueOutcome::Closed;
        }
        match self.sender.try_send(payload) {
            Ok(()) => EnqueueOutcome::Queued,
            Err(TrySendError::Full(_)) => EnqueueOutcome::Full,
            Err(TrySendError::Closed(_)) => EnqueueOutcome::Closed,
        }
    }

    /// Enqueues a payload for this client only.
    ///
    /// A full queue schedules eviction through the hub. Never blocks.
    pub fn send_message(&self, payload: Bytes) -> bool {
        match self.try_enqueue(payload) {
            EnqueueOutcome::Queued => true,
            EnqueueOutcome::Full => {
                warn!(
                    client_id = %self.id,
                    user_id = %self.user_id,
                    "Client queue full, evicting"
                );
                self.close();
                self.hub.schedule_unregister(self.id);
                false
            }
            EnqueueOutcome::Closed => false,
        }
    }

    /// Serializes and enqueues a message.
    pub fn send_json(&self, message: OutboundMessage) -> bool {
        match encode_outbound(message) {
            Ok(payload) => self.send_message(payload),
            Err(e) => {
                error!(client_id = %self.id, error = %e, "Failed to serialize outbound message");
                false
            }
        }
    }

    /// Sends an `error` frame.
    pub fn send_error_message(&self, code: &str, message: impl Into<String>) -> bool {
        self.send_json(OutboundMessage::error(code, message))
    }

    /// Sends an `error` frame describing `err`.
    pub fn send_app_error(&self, err: &AppError) -> bool {
        self.send_error_message(err.kind.code(), err.message.clone())
    }

    /// Records inbound activity.
    pub fn touch(&self) {
        let elapsed = self.started.elapsed().as_millis() as u64;
        self.last_activity_ms.store(elapsed, Ordering::Relaxed);
    }

    /// Wall-clock time of the last inbound activity.
    pub fn last_activity(&self) -> DateTime<Utc> {
        let ms = self.last_activity_ms.load(Ordering::Relaxed);
        self.connected_at + chrono::Duration::milliseconds(ms as i64)
    }

    /// Time since the last inbound activity.
    pub fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_activity_ms.load(Ordering::Relaxed));
        self.started.elapsed().saturating_sub(last)
    }

    /// Cancels the client. Both pumps and the heartbeat stop; later
    /// enqueues report [`EnqueueOutcome::Closed`].
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Whether [`Self::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes once the client is closed.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// The hub this client is registered with.
    pub fn hub(&self) -> &HubHandle {
        &self.hub
    }

    /// Runs an external-service call on behalf of this client.
    ///
    /// The call is abandoned when the per-call budget expires or when the
    /// client closes, whichever comes first.
    pub async fn bounded<T, F>(&self, what: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::service_unavailable(format!(
                "{what} abandoned, connection closed"
            ))),
            result = deadline::bounded(self.call_timeout, what, fut) => result,
        }
    }
}
