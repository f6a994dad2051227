//! Realtime hub metrics.
//!
//! Plain atomic counters. Best-effort operations that fail (last-active
//! updates, per-user notification persistence during a broadcast) are
//! counted here in addition to being logged, so callers and tests can
//! observe them without a return value.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Hub-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Total connections registered
    connections_total: AtomicU64,
    /// Connections currently registered
    connections_active: AtomicU64,
    /// Payloads enqueued onto client queues
    messages_sent: AtomicU64,
    /// Frames received from clients
    messages_received: AtomicU64,
    /// Clients evicted because their queue was full or closed
    clients_evicted: AtomicU64,
    /// Notifications pushed to live connections
    notifications_dispatched: AtomicU64,
    /// Notifications persisted by broadcasts
    notifications_persisted: AtomicU64,
    /// Best-effort side effects that failed
    best_effort_failures: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a registration
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an unregistration
    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record `count` payloads enqueued
    pub fn messages_sent(&self, count: u64) {
        self.messages_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Record an inbound frame
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an eviction
    pub fn client_evicted(&self) {
        self.clients_evicted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a live notification push
    pub fn notification_dispatched(&self) {
        self.notifications_dispatched
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record a persisted notification
    pub fn notification_persisted(&self) {
        self.notifications_persisted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed best-effort side effect
    pub fn best_effort_failed(&self) {
        self.best_effort_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            clients_evicted: self.clients_evicted.load(Ordering::Relaxed),
            notifications_dispatched: self.notifications_dispatched.load(Ordering::Relaxed),
            notifications_persisted: self.notifications_persisted.load(Ordering::Relaxed),
            best_effort_failures: self.best_effort_failures.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever registered
    pub connections_total: u64,
    /// Currently registered connections
    pub connections_active: u64,
    /// Payloads enqueued onto client queues
    pub messages_sent: u64,
    /// Frames received from clients
    pub messages_received: u64,
    /// Clients evicted
    pub clients_evicted: u64,
    /// Notifications pushed live
    pub notifications_dispatched: u64,
    /// Notifications persisted by broadcasts
    pub notifications_persisted: u64,
    /// Failed best-effort side effects
    pub best_effort_failures: u64,
}
