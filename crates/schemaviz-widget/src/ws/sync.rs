use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use crate::channel::{ViewEvent, ViewUpdate};
use crate::state::AppState;

/// WebSocket upgrade handler for view synchronization
pub async fn ws_sync(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_view(socket, state))
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SyncError {
    Error { message: String },
}

/// Drive one attached view: full state first, then every update, while
/// applying the events it sends back.
async fn handle_view(mut socket: WebSocket, state: AppState) {
    // Subscribe before snapshotting so nothing published in between is lost.
    let mut updates = state.widget.subscribe();

    if send_json(&mut socket, &ViewUpdate::State(state.widget.state()))
        .await
        .is_err()
    {
        return;
    }
    tracing::debug!("View attached");

    loop {
        tokio::select! {
            update = updates.recv() => {
                let update = match update {
                    Ok(update) => update,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "View lagged, resending full state");
                        ViewUpdate::State(state.widget.state())
                    }
                    Err(RecvError::Closed) => break,
                };
                if send_json(&mut socket, &update).await.is_err() {
                    break;
                }
            }
            msg = socket.recv() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {}", e);
                        break;
                    }
                };

                let result = match ViewEvent::parse(&text) {
                    Ok(ViewEvent::Refresh) => state.refresh().await.map(|_| ()),
                    Ok(event) => state.widget.apply_event(event),
                    Err(e) => {
                        let _ = send_json(&mut socket, &SyncError::Error {
                            message: format!("Invalid event: {}", e),
                        })
                        .await;
                        continue;
                    }
                };

                if let Err(e) = result {
                    tracing::warn!(error = %e, "View event failed");
                    let _ = send_json(&mut socket, &SyncError::Error {
                        message: e.to_string(),
                    })
                    .await;
                }
            }
        }
    }

    tracing::debug!("View detached");
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(value) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode view update");
            return Ok(());
        }
    };
    socket.send(Message::Text(text)).await
}
