//! Social-graph and content events.

use serde::{Deserialize, Serialize};

use crate::types::{StreamId, UserId};

/// Events that produce notifications or live pushes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocialEvent {
    /// The actor started following `followee_id`.
    UserFollowed {
        /// The followed user.
        followee_id: UserId,
        /// Display name of the actor.
        actor_name: String,
    },
    /// The actor commented on a post.
    PostCommented {
        /// Author of the post.
        author_id: UserId,
        /// The post.
        post_id: String,
        /// Display name of the actor.
        actor_name: String,
        /// Comment excerpt.
        excerpt: String,
    },
    /// The actor liked a post.
    PostLiked {
        /// Author of the post.
        author_id: UserId,
        /// The post.
        post_id: String,
        /// Display name of the actor.
        actor_name: String,
    },
    /// The actor mentioned users in a post or comment.
    UsersMentioned {
        /// Mentioned users.
        user_ids: Vec<UserId>,
        /// The post.
        post_id: String,
        /// Display name of the actor.
        actor_name: String,
    },
    /// The actor went live.
    LiveStreamStarted {
        /// The stream.
        stream_id: StreamId,
        /// Stream title.
        title: String,
        /// Display name of the actor.
        actor_name: String,
    },
    /// Platform-wide announcement pushed to every connected client.
    SystemAnnouncement {
        /// Short title.
        title: String,
        /// Body text.
        message: String,
    },
}
