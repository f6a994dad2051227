//! User directory: social graph lookups and activity bookkeeping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::AppResult;
use crate::types::UserId;

/// Read access to the social graph plus last-active updates.
///
/// The meaning of "friend" (mutual follow, one-directional follow, explicit
/// friendship) belongs to the implementation; presence fan-out uses whatever
/// list [`UserDirectory::friends`] returns.
#[async_trait]
pub trait UserDirectory: std::fmt::Debug + Send + Sync + 'static {
    /// Users that should see `user_id`'s presence changes.
    async fn friends(&self, user_id: UserId) -> AppResult<Vec<UserId>>;

    /// Record the most recent activity instant for a user.
    async fn touch_last_active(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()>;
}
