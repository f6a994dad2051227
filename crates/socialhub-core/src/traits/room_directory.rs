//! Room and live-stream membership.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::UserId;

/// Membership lists keyed by an opaque room key (`room:<id>` for chat
/// rooms, `stream:<id>` for live-stream audiences).
#[async_trait]
pub trait RoomDirectory: std::fmt::Debug + Send + Sync + 'static {
    /// Add a member. Returns `false` if the user was already a member.
    async fn join(&self, room: &str, user_id: UserId) -> AppResult<bool>;

    /// Remove a member. Returns `false` if the user was not a member.
    async fn leave(&self, room: &str, user_id: UserId) -> AppResult<bool>;

    /// Current members of a room.
    async fn members(&self, room: &str) -> AppResult<Vec<UserId>>;

    /// Whether `user_id` is a member of `room`.
    async fn is_member(&self, room: &str, user_id: UserId) -> AppResult<bool>;
}
