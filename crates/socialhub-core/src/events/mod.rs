//! Domain events emitted by SocialHub services.
//!
//! Out-of-scope services (follow, comment, streaming handlers) publish
//! these; the realtime event bridge turns them into notifications and
//! live pushes.

pub mod social;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

pub use social::SocialEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event.
    pub actor_id: UserId,
    /// The event payload.
    pub payload: SocialEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: UserId, payload: SocialEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }
}
