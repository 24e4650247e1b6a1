//! `GET /api/v1/ws`: the authenticated change feed.
//!
//! Each connection gets its own bus receiver. Events are forwarded as JSON
//! text frames, optionally narrowed to one entity kind.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use backoffice_events::event_types::EntityKind;
use backoffice_events::PlatformEvent;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query string of the feed endpoint.
///
/// Browsers cannot set headers on a WebSocket handshake, so the access
/// token travels as `?token=`. `entity` optionally narrows the feed to one
/// kind (`purchase_request`, `employee`, `invoice`); any other value is
/// rejected with 400 before the upgrade.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub token: String,
    pub entity: Option<EntityKind>,
}

/// GET /api/v1/ws?token=<access token>[&entity=<kind>]
///
/// Authenticates, then upgrades and forwards every bus event as a JSON text
/// frame.
pub async fn ws_handler(
    Query(query): Query<FeedQuery>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> AppResult<impl IntoResponse> {
    let user = AuthUser::from_token(&query.token, &state.config.jwt)?;
    let rx = state.event_bus.subscribe();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, rx, user, query.entity)))
}

/// Manage a single feed connection after upgrade.
///
/// A sender task drains the bus receiver into the socket; the current task
/// reads inbound frames until the client goes away.
async fn handle_socket(
    socket: WebSocket,
    mut rx: broadcast::Receiver<PlatformEvent>,
    user: AuthUser,
    entity: Option<EntityKind>,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = user.user_id, "Change feed connected");

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(conn_id = %sender_conn_id, skipped, "Change feed lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if entity.is_some_and(|kind| !event.concerns(kind.as_str())) {
                continue;
            }
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize feed event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id = user.user_id, "Change feed disconnected");
}
