//! The hub loop task.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use socialhub_core::types::{ClientId, UserId};

use super::command::HubCommand;
use super::registry::Registry;
use super::{HubStats, MembershipEvent};
use crate::connection::{Client, EnqueueOutcome};
use crate::metrics::RealtimeMetrics;

/// State owned by the hub task.
pub struct HubLoop {
    registry: Registry,
    membership: mpsc::UnboundedSender<MembershipEvent>,
    metrics: Arc<RealtimeMetrics>,
}

impl HubLoop {
    /// Creates the loop state. Membership transitions are reported on
    /// `membership`.
    pub fn new(
        membership: mpsc::UnboundedSender<MembershipEvent>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            registry: Registry::new(),
            membership,
            metrics,
        }
    }

    /// Processes commands until shutdown or until every handle is dropped.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<HubCommand>) {
        info!("Hub loop started");
        while let Some(command) = commands.recv().await {
            if !self.handle(command) {
                break;
            }
        }
        for client in self.registry.drain() {
            client.close();
        }
        info!("Hub loop stopped");
    }

    /// Applies one command. Returns `false` when the loop should stop.
    fn handle(&mut self, command: HubCommand) -> bool {
        match command {
            HubCommand::Register { client, done } => {
                self.register(client);
                let _ = done.send(());
            }
            HubCommand::Unregister { client_id, done } => {
                let removed = self.unregister(&client_id);
                if let Some(done) = done {
                    let _ = done.send(removed);
                }
            }
            HubCommand::SendToUser {
                user_id,
                payload,
                done,
            } => {
                let _ = done.send(self.send_to_user(&user_id, &payload));
            }
            HubCommand::SendToUsers {
                user_ids,
                payload,
                done,
            } => {
                let delivered = user_ids
                    .iter()
                    .map(|user_id| self.send_to_user(user_id, &payload))
                    .sum();
                let _ = done.send(delivered);
            }
            HubCommand::BroadcastAll { payload, done } => {
                let targets = self.registry.all_clients();
                let delivered = self.deliver_all(&targets, &payload);
                let _ = done.send(delivered);
            }
            HubCommand::IsOnline { user_id, reply } => {
                let _ = reply.send(self.registry.is_online(&user_id));
            }
            HubCommand::FilterOnline { user_ids, reply } => {
                let online = user_ids
                    .into_iter()
                    .filter(|u| self.registry.is_online(u))
                    .collect();
                let _ = reply.send(online);
            }
            HubCommand::OnlineUsers { reply } => {
                let _ = reply.send(self.registry.online_users());
            }
            HubCommand::UserClients { user_id, reply } => {
                let _ = reply.send(self.registry.user_clients(&user_id));
            }
            HubCommand::Stats { reply } => {
                let _ = reply.send(HubStats {
                    clients: self.registry.client_count(),
                    users: self.registry.user_count(),
                });
            }
            HubCommand::Shutdown { done } => {
                let count = self.registry.client_count();
                for client in self.registry.drain() {
                    client.close();
                }
                info!(clients = count, "Hub shut down");
                let _ = done.send(());
                return false;
            }
        }
        true
    }

    fn register(&mut self, client: Arc<Client>) {
        let (client_id, user_id) = (client.id, client.user_id);
        if client.is_closed() {
            debug!(client_id = %client_id, "Ignoring registration of closed client");
            return;
        }
        let first = self.registry.insert(client);
        self.metrics.connection_opened();
        debug!(
            client_id = %client_id,
            user_id = %user_id,
            clients = self.registry.client_count(),
            "Client registered"
        );
        if first {
            let _ = self.membership.send(MembershipEvent::Online(user_id));
        }
    }

    fn unregister(&mut self, client_id: &ClientId) -> bool {
        let Some((client, went_offline)) = self.registry.remove(client_id) else {
            return false;
        };
        client.close();
        self.metrics.connection_closed();
        debug!(
            client_id = %client.id,
            user_id = %client.user_id,
            clients = self.registry.client_count(),
            "Client unregistered"
        );
        if went_offline {
            let _ = self.membership.send(MembershipEvent::Offline(client.user_id));
        }
        true
    }

    fn send_to_user(&mut self, user_id: &UserId, payload: &Bytes) -> usize {
        let targets = self.registry.user_clients(user_id);
        self.deliver_all(&targets, payload)
    }

    /// Enqueues `payload` on each target, evicting clients whose queue is
    /// full or closed. Returns the number of successful enqueues.
    fn deliver_all(&mut self, targets: &[Arc<Client>], payload: &Bytes) -> usize {
        let mut delivered = 0;
        for client in targets {
            match client.try_enqueue(payload.clone()) {
                EnqueueOutcome::Queued => delivered += 1,
                EnqueueOutcome::Full => {
                    warn!(
                        client_id = %client.id,
                        user_id = %client.user_id,
                        "Client queue full, evicting"
                    );
                    if self.unregister(&client.id) {
                        self.metrics.client_evicted();
                    }
                }
                EnqueueOutcome::Closed => {
                    self.unregister(&client.id);
                }
            }
        }
        self.metrics.messages_sent(delivered as u64);
        delivered
    }
}
