//! Consumer of hub membership events.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::dispatcher::PresenceDispatcher;
use crate::features::LiveStreamDispatcher;
use crate::hub::MembershipEvent;

/// Drives presence broadcasts from hub membership transitions. A user going
/// offline also leaves every stream audience.
///
/// Runs until the hub loop stops and the channel closes. Events are handled
/// one at a time, so a user's online and offline broadcasts go out in the
/// order the hub observed them.
pub async fn run_membership(
    presence: Arc<PresenceDispatcher>,
    streams: LiveStreamDispatcher,
    mut events: mpsc::UnboundedReceiver<MembershipEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            MembershipEvent::Online(user_id) => presence.notify_user_online(user_id).await,
            MembershipEvent::Offline(user_id) => {
                presence.notify_user_offline(user_id).await;
                streams.remove_viewer(user_id).await;
            }
        }
    }
    debug!("Membership task stopped");
}
