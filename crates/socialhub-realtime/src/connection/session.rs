//! Read and write pumps for one connection.
//!
//! The transport is abstracted as a `Stream` of inbound frames and a `Sink`
//! of outbound payloads, so the same code serves axum WebSockets and
//! in-process channels.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::client::Client;
use super::heartbeat::{HeartbeatConfig, run_heartbeat};
use crate::router::MessageRouter;

/// Reads frames until the stream ends, fails, or the client closes.
/// Each frame refreshes the client's activity and is routed.
pub async fn read_pump<S, E>(client: &Arc<Client>, mut inbound: S, router: &MessageRouter)
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: fmt::Display,
{
    loop {
        let frame = tokio::select! {
            _ = client.cancelled() => break,
            frame = inbound.next() => frame,
        };

        match frame {
            Some(Ok(raw)) => {
                client.touch();
                router.route(client, &raw).await;
            }
            Some(Err(e)) => {
                debug!(client_id = %client.id, error = %e, "Read error");
                break;
            }
            None => break,
        }
    }
}

/// Drains the outbound queue into the sink in FIFO order.
///
/// Ends when the client closes or a write fails; a failed write closes the
/// client so the read pump stops too.
pub async fn write_pump<K>(client: Arc<Client>, mut queue: mpsc::Receiver<Bytes>, mut sink: K)
where
    K: Sink<Bytes> + Unpin,
    K::Error: fmt::Display,
{
    loop {
        let payload = tokio::select! {
            biased;
            _ = client.cancelled() => break,
            payload = queue.recv() => match payload {
                Some(payload) => payload,
                None => break,
            },
        };

        if let Err(e) = sink.send(payload).await {
            debug!(client_id = %client.id, error = %e, "Write error");
            client.close();
            break;
        }
    }

    let _ = sink.close().await;
}

/// Serves a registered client until its transport closes.
///
/// Spawns the write pump and heartbeat, runs the read pump on the current
/// task, then closes the client and unregisters it exactly once.
pub async fn run_session<S, E, K>(
    client: Arc<Client>,
    queue: mpsc::Receiver<Bytes>,
    inbound: S,
    sink: K,
    router: &MessageRouter,
    heartbeat: HeartbeatConfig,
) where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: fmt::Display,
    K: Sink<Bytes> + Unpin + Send + 'static,
    K::Error: fmt::Display + Send,
{
    info!(client_id = %client.id, user_id = %client.user_id, "Session started");

    let writer = tokio::spawn(write_pump(client.clone(), queue, sink));
    let heartbeat = tokio::spawn(run_heartbeat(client.clone(), heartbeat));

    read_pump(&client, inbound, router).await;

    client.close();
    heartbeat.abort();
    if let Err(e) = writer.await {
        if e.is_panic() {
            error!(client_id = %client.id, "Write pump panicked");
        }
    }

    client.hub().unregister(client.id).await;
    info!(client_id = %client.id, user_id = %client.user_id, "Session ended");
}
