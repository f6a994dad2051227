//! Commands accepted by the hub loop.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::oneshot;

use socialhub_core::types::{ClientId, UserId};

use super::HubStats;
use crate::connection::Client;

/// A request to the hub loop. Replies travel back on the embedded
/// `oneshot` sender.
#[derive(Debug)]
pub enum HubCommand {
    /// Add a client.
    Register {
        client: Arc<Client>,
        done: oneshot::Sender<()>,
    },
    /// Remove a client. `done` receives whether it was registered.
    Unregister {
        client_id: ClientId,
        done: Option<oneshot::Sender<bool>>,
    },
    /// Enqueue a payload on every client of one user.
    SendToUser {
        user_id: UserId,
        payload: Bytes,
        done: oneshot::Sender<usize>,
    },
    /// Enqueue a payload on every client of several users.
    SendToUsers {
        user_ids: Vec<UserId>,
        payload: Bytes,
        done: oneshot::Sender<usize>,
    },
    /// Enqueue a payload on every registered client.
    BroadcastAll {
        payload: Bytes,
        done: oneshot::Sender<usize>,
    },
    IsOnline {
        user_id: UserId,
        reply: oneshot::Sender<bool>,
    },
    /// Keep only the users that are online, preserving input order.
    FilterOnline {
        user_ids: Vec<UserId>,
        reply: oneshot::Sender<Vec<UserId>>,
    },
    OnlineUsers {
        reply: oneshot::Sender<Vec<UserId>>,
    },
    UserClients {
        user_id: UserId,
        reply: oneshot::Sender<Vec<Arc<Client>>>,
    },
    Stats {
        reply: oneshot::Sender<HubStats>,
    },
    /// Close every client and stop the loop.
    Shutdown { done: oneshot::Sender<()> },
}
