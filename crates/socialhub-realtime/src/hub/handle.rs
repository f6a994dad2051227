//! Cloneable front end of the hub loop.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use socialhub_core::config::RealtimeConfig;
use socialhub_core::types::{ClientId, UserId};

use super::command::HubCommand;
use super::event_loop::HubLoop;
use super::{HubStats, MembershipEvent};
use crate::connection::Client;
use crate::metrics::RealtimeMetrics;

/// Handle to the hub loop.
///
/// Every operation is a command to the loop. Once the loop has stopped,
/// mutations become no-ops and queries return empty results.
#[derive(Clone)]
pub struct HubHandle {
    commands: mpsc::UnboundedSender<HubCommand>,
    queue_capacity: usize,
    call_timeout: Duration,
}

impl fmt::Debug for HubHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubHandle")
            .field("queue_capacity", &self.queue_capacity)
            .field("running", &!self.commands.is_closed())
            .finish()
    }
}

impl HubHandle {
    /// Spawns the hub loop on the current runtime.
    ///
    /// Returns the handle and the receiving end of the membership channel,
    /// which the caller must drain.
    pub fn spawn(
        config: &RealtimeConfig,
        metrics: Arc<RealtimeMetrics>,
    ) -> (Self, mpsc::UnboundedReceiver<MembershipEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (membership_tx, membership_rx) = mpsc::unbounded_channel();

        tokio::spawn(HubLoop::new(membership_tx, metrics).run(command_rx));

        let handle = Self::from_parts(
            command_tx,
            config.client_queue_capacity.max(1),
            config.external_call_timeout(),
        );
        (handle, membership_rx)
    }

    pub(crate) fn from_parts(
        commands: mpsc::UnboundedSender<HubCommand>,
        queue_capacity: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            commands,
            queue_capacity,
            call_timeout,
        }
    }

    /// Creates a client for `user_id` and registers it.
    ///
    /// Returns the client and the receiving end of its outbound queue, which
    /// belongs to the write pump.
    pub async fn connect(&self, user_id: UserId) -> (Arc<Client>, mpsc::Receiver<Bytes>) {
        let (client, queue) =
            Client::new(user_id, self.queue_capacity, self.clone(), self.call_timeout);
        let client = Arc::new(client);
        self.register(client.clone()).await;
        (client, queue)
    }

    /// Adds a client. Resolves once the registry contains it.
    pub async fn register(&self, client: Arc<Client>) {
        self.request(|done| HubCommand::Register { client, done })
            .await
    }

    /// Removes a client and closes it. Resolves once the registry no longer
    /// contains it; returns `false` if it was not registered.
    pub async fn unregister(&self, client_id: ClientId) -> bool {
        self.request(|done| HubCommand::Unregister {
            client_id,
            done: Some(done),
        })
        .await
    }

    /// Fire-and-forget [`Self::unregister`]. Never blocks.
    pub fn schedule_unregister(&self, client_id: ClientId) {
        let command = HubCommand::Unregister {
            client_id,
            done: None,
        };
        if self.commands.send(command).is_err() {
            debug!(client_id = %client_id, "Hub stopped, unregister dropped");
        }
    }

    /// Enqueues `payload` on every client of `user_id`. Returns the number
    /// of clients it was enqueued on; an offline user yields 0.
    pub async fn send_to_user(&self, user_id: UserId, payload: Bytes) -> usize {
        self.request(|done| HubCommand::SendToUser {
            user_id,
            payload,
            done,
        })
        .await
    }

    /// [`Self::send_to_user`] for each of `user_ids`.
    pub async fn broadcast_to_users(&self, user_ids: Vec<UserId>, payload: Bytes) -> usize {
        if user_ids.is_empty() {
            return 0;
        }
        self.request(|done| HubCommand::SendToUsers {
            user_ids,
            payload,
            done,
        })
        .await
    }

    /// Enqueues `payload` on every registered client.
    pub async fn broadcast_all(&self, payload: Bytes) -> usize {
        self.request(|done| HubCommand::BroadcastAll { payload, done })
            .await
    }

    /// Whether the user has at least one registered client.
    pub async fn is_user_online(&self, user_id: UserId) -> bool {
        self.request(|reply| HubCommand::IsOnline { user_id, reply })
            .await
    }

    /// The subset of `user_ids` that is online, in input order.
    pub async fn filter_online(&self, user_ids: Vec<UserId>) -> Vec<UserId> {
        if user_ids.is_empty() {
            return user_ids;
        }
        self.request(|reply| HubCommand::FilterOnline { user_ids, reply })
            .await
    }

    /// Every online user.
    pub async fn online_users(&self) -> Vec<UserId> {
        self.request(|reply| HubCommand::OnlineUsers { reply }).await
    }

    /// Clients of a user in connection order.
    pub async fn user_clients(&self, user_id: UserId) -> Vec<Arc<Client>> {
        self.request(|reply| HubCommand::UserClients { user_id, reply })
            .await
    }

    /// Number of registered clients.
    pub async fn client_count(&self) -> usize {
        self.stats().await.clients
    }

    /// Number of online users.
    pub async fn user_count(&self) -> usize {
        self.stats().await.users
    }

    /// Registry counts.
    pub async fn stats(&self) -> HubStats {
        self.request(|reply| HubCommand::Stats { reply }).await
    }

    /// Closes every client and stops the loop.
    pub async fn shutdown(&self) {
        self.request(|done| HubCommand::Shutdown { done }).await
    }

    /// Whether the loop is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    async fn request<T, F>(&self, build: F) -> T
    where
        T: Default,
        F: FnOnce(oneshot::Sender<T>) -> HubCommand,
    {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(build(tx)).is_err() {
            return T::default();
        }
        rx.await.unwrap_or_default()
    }
}
