//! Real-time hub configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of each client's outbound queue. A client whose queue is
    /// full when a message arrives is evicted.
    #[serde(default = "default_client_queue_capacity")]
    pub client_queue_capacity: usize,
    /// Server ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Seconds without inbound traffic after which a client is closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Time budget for a single external-service call made on behalf of a client.
    #[serde(default = "default_external_call_timeout")]
    pub external_call_timeout_ms: u64,
    /// Maximum inbound frame size in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size_bytes: usize,
    /// Maximum chat / comment text length in characters.
    #[serde(default = "default_max_chat_length")]
    pub max_chat_length: usize,
    /// Number of notifications returned by a `get_notifications` request.
    #[serde(default = "default_recent_notifications_limit")]
    pub recent_notifications_limit: usize,
}

impl RealtimeConfig {
    /// Ping interval as a [`Duration`].
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_seconds)
    }

    /// Idle timeout as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }

    /// External call budget as a [`Duration`].
    pub fn external_call_timeout(&self) -> Duration {
        Duration::from_millis(self.external_call_timeout_ms)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            client_queue_capacity: default_client_queue_capacity(),
            ping_interval_seconds: default_ping_interval(),
            idle_timeout_seconds: default_idle_timeout(),
            external_call_timeout_ms: default_external_call_timeout(),
            max_message_size_bytes: default_max_message_size(),
            max_chat_length: default_max_chat_length(),
            recent_notifications_limit: default_recent_notifications_limit(),
        }
    }
}

fn default_client_queue_capacity() -> usize {
    256
}

fn default_ping_interval() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    90
}

fn default_external_call_timeout() -> u64 {
    5000
}

fn default_max_message_size() -> usize {
    65_536
}

fn default_max_chat_length() -> usize {
    4000
}

fn default_recent_notifications_limit() -> usize {
    50
}
