//! Server keepalive pings and idle detection.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use socialhub_core::config::RealtimeConfig;

use super::client::Client;
use crate::message::OutboundMessage;

/// Heartbeat configuration
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Inactivity after which the client is closed
    pub idle_timeout: Duration,
}

impl HeartbeatConfig {
    /// Reads the heartbeat settings from the realtime config.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            idle_timeout: config.idle_timeout(),
        }
    }
}

/// Run the heartbeat for a client until it closes.
///
/// Each tick closes the client if it has been idle for `idle_timeout`,
/// otherwise sends a `ping` frame. The first tick happens one interval after
/// start.
pub async fn run_heartbeat(client: Arc<Client>, config: HeartbeatConfig) {
    let period = config.ping_interval.max(Duration::from_millis(1));
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = client.cancelled() => break,
            _ = ticker.tick() => {
                let idle = client.idle_for();
                if idle >= config.idle_timeout {
                    info!(
                        client_id = %client.id,
                        user_id = %client.user_id,
                        idle_ms = idle.as_millis() as u64,
                        "Client idle timeout, closing"
                    );
                    client.close();
                    break;
                }
                if !client.send_json(OutboundMessage::Ping) {
                    break;
                }
            }
        }
    }

    debug!(client_id = %client.id, "Heartbeat ended");
}
