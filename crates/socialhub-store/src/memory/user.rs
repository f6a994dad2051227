//! In-memory user directory backed by a follow graph.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use socialhub_core::result::AppResult;
use socialhub_core::traits::UserDirectory;
use socialhub_core::types::UserId;

/// Follow graph plus last-active timestamps.
///
/// Friends are mutual follows: `a` and `b` are friends when each follows
/// the other.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    /// Follower → set of followed users.
    following: DashMap<UserId, HashSet<UserId>>,
    /// User → last recorded activity.
    last_active: DashMap<UserId, DateTime<Utc>>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `follower` follows `followee`.
    pub fn follow(&self, follower: UserId, followee: UserId) {
        self.following.entry(follower).or_default().insert(followee);
    }

    /// Remove a follow edge.
    pub fn unfollow(&self, follower: UserId, followee: UserId) {
        if let Some(mut set) = self.following.get_mut(&follower) {
            set.remove(&followee);
        }
    }

    /// Make two users mutual followers.
    pub fn befriend(&self, a: UserId, b: UserId) {
        self.follow(a, b);
        self.follow(b, a);
    }

    /// Last recorded activity for a user.
    pub fn last_active(&self, user_id: UserId) -> Option<DateTime<Utc>> {
        self.last_active.get(&user_id).map(|r| *r.value())
    }

    fn follows(&self, follower: UserId, followee: UserId) -> bool {
        self.following
            .get(&follower)
            .map(|set| set.contains(&followee))
            .unwrap_or(false)
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn friends(&self, user_id: UserId) -> AppResult<Vec<UserId>> {
        let followed: Vec<UserId> = self
            .following
            .get(&user_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();

        let mut friends: Vec<UserId> = followed
            .into_iter()
            .filter(|other| self.follows(*other, user_id))
            .collect();
        friends.sort();
        Ok(friends)
    }

    async fn touch_last_active(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()> {
        self.last_active.insert(user_id, at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_friends_are_mutual_follows() {
        let dir = MemoryUserDirectory::new();
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());
        dir.befriend(a, b);
        dir.follow(a, c);

        assert_eq!(dir.friends(a).await.unwrap(), vec![b]);
        assert!(dir.friends(c).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unfollow_breaks_friendship() {
        let dir = MemoryUserDirectory::new();
        let (a, b) = (UserId::new(), UserId::new());
        dir.befriend(a, b);
        dir.unfollow(b, a);
        assert!(dir.friends(a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_touch_last_active() {
        let dir = MemoryUserDirectory::new();
        let user = UserId::new();
        assert!(dir.last_active(user).is_none());
        let now = Utc::now();
        dir.touch_last_active(user, now).await.unwrap();
        assert_eq!(dir.last_active(user), Some(now));
    }
}
