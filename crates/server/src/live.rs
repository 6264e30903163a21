// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live notification streaming for connected UIs.
//!
//! Each socket carries the events its caller may see: its own
//! notifications, and status changes of the orders it may read. Events are informational
//! only; clients still read canonical state over HTTP.
//!
//! Browsers cannot set headers on a WebSocket upgrade, so the caller may
//! also be named with an `actor_id` query parameter.

use axum::{
    extract::{
        Query, State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::{HeaderMap, StatusCode},
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use pilot_dispatch_api::{AuthenticatedActor, LiveEvent};
use pilot_dispatch_domain::AccountId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use crate::session::ACTOR_HEADER;
use crate::{AppState, HttpError};

/// Query parameters for the live endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LiveQuery {
    /// The caller's account id, when the header cannot be sent.
    #[serde(default)]
    actor_id: Option<String>,
}

/// First frame sent on every connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Connected {
    /// Always `connected`.
    #[serde(rename = "type")]
    kind: String,
    /// The account the stream is filtered for.
    actor_id: AccountId,
    /// Server time (RFC 3339).
    timestamp: String,
}

/// Serializes an event for one caller, or `None` if it is not theirs.
fn payload_for(event: &LiveEvent, actor: &AuthenticatedActor) -> Option<String> {
    if !event.is_visible_to(actor) {
        return None;
    }
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            error!(?e, "Failed to serialize live event");
            None
        }
    }
}

/// Upgrades the connection and streams the caller's live events.
///
/// # Errors
///
/// Returns HTTP 401 if no caller is named or the caller is unknown.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<LiveQuery>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let actor_id: String = query
        .actor_id
        .or_else(|| {
            headers
                .get(ACTOR_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(String::from)
        })
        .ok_or_else(|| {
            HttpError::new(
                StatusCode::UNAUTHORIZED,
                format!("Missing {ACTOR_HEADER} header or actor_id parameter"),
            )
        })?;
    let actor: AuthenticatedActor = app_state.service.resolve_actor(&actor_id)?;
    let rx: broadcast::Receiver<LiveEvent> = app_state.service.subscribe();

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, actor, rx)))
}

async fn handle_socket(
    socket: WebSocket,
    actor: AuthenticatedActor,
    mut rx: broadcast::Receiver<LiveEvent>,
) {
    let actor_id: AccountId = actor.id.clone();
    info!(actor_id = %actor_id, "Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();

    let connected: Connected = Connected {
        kind: String::from("connected"),
        actor_id: actor_id.clone(),
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| String::from("unknown")),
    };
    if let Ok(json) = serde_json::to_string(&connected)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let Some(json) = payload_for(&event, &actor) else {
                        continue;
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(actor_id = %actor.id, skipped, "Live subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Clients only send close frames; anything else is ignored.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!(actor_id = %actor_id, "Client disconnected from live event stream");
}
