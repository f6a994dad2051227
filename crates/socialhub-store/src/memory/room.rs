//! In-memory room membership.

use async_trait::async_trait;
use dashmap::DashMap;

use socialhub_core::result::AppResult;
use socialhub_core::traits::RoomDirectory;
use socialhub_core::types::UserId;

/// Room key → members in join order.
#[derive(Debug, Default)]
pub struct MemoryRoomDirectory {
    rooms: DashMap<String, Vec<UserId>>,
}

impl MemoryRoomDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-empty rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[async_trait]
impl RoomDirectory for MemoryRoomDirectory {
    async fn join(&self, room: &str, user_id: UserId) -> AppResult<bool> {
        let mut members = self.rooms.entry(room.to_string()).or_default();
        if members.contains(&user_id) {
            return Ok(false);
        }
        members.push(user_id);
        Ok(true)
    }

    async fn leave(&self, room: &str, user_id: UserId) -> AppResult<bool> {
        let Some(mut members) = self.rooms.get_mut(room) else {
            return Ok(false);
        };
        let before = members.len();
        members.retain(|m| *m != user_id);
        let removed = members.len() < before;
        if members.is_empty() {
            drop(members);
            self.rooms.remove_if(room, |_, m| m.is_empty());
        }
        Ok(removed)
    }

    async fn members(&self, room: &str) -> AppResult<Vec<UserId>> {
        Ok(self
            .rooms
            .get(room)
            .map(|m| m.value().clone())
            .unwrap_or_default())
    }

    async fn is_member(&self, room: &str, user_id: UserId) -> AppResult<bool> {
        Ok(self
            .rooms
            .get(room)
            .map(|m| m.contains(&user_id))
            .unwrap_or(false))
    }
}
