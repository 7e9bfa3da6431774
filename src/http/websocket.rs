//! Live event stream over WebSocket.
//!
//! # Responsibilities
//! - Upgrade `GET {events.path}` to a WebSocket
//! - Send one text frame per proxy event
//! - Stop on client close or server shutdown
//!
//! # Data Flow
//! ```text
//! EventHub (broadcast) ──── text frames ────→ Client
//! ```
//!
//! # Design Decisions
//! - Server → client only; inbound frames other than Close are ignored
//! - A lagging client skips the lines it missed and keeps streaming

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::http::server::AppState;

pub async fn event_stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let events = state.hub.subscribe();
    let shutdown = state.shutdown.subscribe();
    tracing::debug!(subscribers = state.hub.subscriber_count(), "Event stream upgrade requested");
    ws.on_upgrade(move |socket| stream_events(socket, events, shutdown))
}

async fn stream_events(
    mut socket: WebSocket,
    mut events: broadcast::Receiver<String>,
    mut shutdown: broadcast::Receiver<()>,
) {
    tracing::debug!("Event stream subscriber connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(line) => {
                    if socket.send(Message::Text(line.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Event stream subscriber lagging");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
            _ = shutdown.recv() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        }
    }

    tracing::debug!("Event stream subscriber disconnected");
}
