use std::sync::Arc;

use ager_core::QueueEvent;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe before reading the snapshot so no update falls in between.
    let mut rx = state.broadcast.subscribe();
    info!("live client connected");

    if let Some(initial) = initial_message(&state).await
        && sender.send(Message::Text(initial.into())).await.is_err()
    {
        return;
    }

    let send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "live client lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Incoming frames carry nothing we act on; only watch for close.
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }
    debug!("live client disconnected");
}

/// Current queue state as a `queue_update` message.
async fn initial_message(state: &AppState) -> Option<String> {
    let event = QueueEvent::QueueUpdate(state.queue.snapshot().await);
    match serde_json::to_string(&event) {
        Ok(json) => Some(json),
        Err(err) => {
            error!(%err, "failed to serialize initial snapshot");
            None
        }
    }
}
