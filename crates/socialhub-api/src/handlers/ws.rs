//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use bytes::Bytes;
use futures::{SinkExt, StreamExt, future};
use serde::Deserialize;
use tracing::info;

use socialhub_core::types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Stands in for protocol-level ping and pong frames so they count as
/// activity without producing a reply.
const KEEPALIVE_FRAME: &[u8] = br#"{"type":"pong"}"#;

/// Query parameter for WebSocket authentication.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    #[serde(default)]
    pub token: String,
}

/// GET /ws?token={jwt}: WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    // Authenticate before upgrade
    let user_id = state.authenticator.authenticate(&query.token)?;
    let max_size = state.realtime.config().max_message_size_bytes;

    Ok(ws
        .max_message_size(max_size)
        .on_upgrade(move |socket| handle_ws_connection(state, user_id, socket)))
}

/// Serves an established WebSocket connection until either side closes.
async fn handle_ws_connection(state: AppState, user_id: UserId, socket: WebSocket) {
    info!(user_id = %user_id, "WebSocket connection established");

    let (ws_tx, ws_rx) = socket.split();

    // A close frame ends the stream.
    let inbound = ws_rx
        .take_while(|frame| future::ready(!matches!(frame, Ok(Message::Close(_)))))
        .filter_map(|frame| {
            future::ready(match frame {
                Ok(message) => inbound_payload(message).map(Ok),
                Err(e) => Some(Err(e)),
            })
        });

    let outbound = ws_tx.with(|payload: Bytes| {
        let text = String::from_utf8_lossy(&payload).into_owned();
        future::ready(Ok::<_, axum::Error>(Message::Text(text.into())))
    });

    state
        .realtime
        .serve_connection(user_id, inbound, outbound)
        .await;

    info!(user_id = %user_id, "WebSocket connection closed");
}

/// Payload handed to the session for one WebSocket frame.
fn inbound_payload(message: Message) -> Option<Bytes> {
    match message {
        Message::Text(text) => Some(Bytes::copy_from_slice(text.as_str().as_bytes())),
        Message::Binary(data) => Some(data),
        Message::Ping(_) | Message::Pong(_) => Some(Bytes::from_static(KEEPALIVE_FRAME)),
        Message::Close(_) => None,
    }
}
