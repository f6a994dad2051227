//! Client registry indexed by client ID and by user.

use std::collections::HashMap;
use std::sync::Arc;

use socialhub_core::types::{ClientId, UserId};

use crate::connection::Client;

/// Registered clients.
///
/// A client appears in `clients` exactly when it appears in the list of its
/// own user. Lists are never empty: the user key is dropped together with
/// its last client.
#[derive(Debug, Default)]
pub struct Registry {
    /// Client ID → client.
    clients: HashMap<ClientId, Arc<Client>>,
    /// User ID → clients in connection order.
    user_clients: HashMap<UserId, Vec<Arc<Client>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client. Returns `true` when this is the user's first client.
    ///
    /// Re-inserting an already registered client is ignored.
    pub fn insert(&mut self, client: Arc<Client>) -> bool {
        if self.clients.contains_key(&client.id) {
            return false;
        }
        self.clients.insert(client.id, client.clone());
        let list = self.user_clients.entry(client.user_id).or_default();
        list.push(client);
        list.len() == 1
    }

    /// Removes a client. Returns it together with whether it was the user's
    /// last one, or `None` if it was not registered.
    pub fn remove(&mut self, client_id: &ClientId) -> Option<(Arc<Client>, bool)> {
        let client = self.clients.remove(client_id)?;
        let mut went_offline = false;
        if let Some(list) = self.user_clients.get_mut(&client.user_id) {
            list.retain(|c| c.id != *client_id);
            if list.is_empty() {
                self.user_clients.remove(&client.user_id);
                went_offline = true;
            }
        }
        Some((client, went_offline))
    }

    /// Clients of a user in connection order.
    pub fn user_clients(&self, user_id: &UserId) -> Vec<Arc<Client>> {
        self.user_clients.get(user_id).cloned().unwrap_or_default()
    }

    /// Every registered client.
    pub fn all_clients(&self) -> Vec<Arc<Client>> {
        self.clients.values().cloned().collect()
    }

    /// Whether the user has at least one client.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.user_clients.contains_key(user_id)
    }

    /// Users with at least one client.
    pub fn online_users(&self) -> Vec<UserId> {
        self.user_clients.keys().copied().collect()
    }

    /// Number of registered clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Number of online users.
    pub fn user_count(&self) -> usize {
        self.user_clients.len()
    }

    /// Removes everything, returning the clients that were registered.
    pub fn drain(&mut self) -> Vec<Arc<Client>> {
        self.user_clients.clear();
        self.clients.drain().map(|(_, c)| c).collect()
    }
}
