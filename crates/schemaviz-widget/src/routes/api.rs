use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::channel::ViewEvent;
use crate::error::{Result, WidgetError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/entities", get(get_entities))
        .route("/api/event", post(post_event))
        .route("/api/refresh", post(refresh))
}

// ============================================================================
// Synced state
// ============================================================================

async fn get_state(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "state": state.widget.state(),
    }))
}

/// The bare entity mapping, exactly as a renderer consumes it.
async fn get_entities(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.widget.entities()))
}

// ============================================================================
// View events
// ============================================================================

async fn post_event(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ViewEvent>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(event) = payload.map_err(|e| WidgetError::InvalidEvent(e.body_text()))?;

    match event {
        ViewEvent::Refresh => {
            state.refresh().await?;
        }
        other => state.widget.apply_event(other)?,
    }

    Ok(Json(json!({
        "success": true,
        "value": state.widget.value(),
    })))
}

async fn refresh(State(state): State<AppState>) -> Result<Json<Value>> {
    let count = state.refresh().await?;

    Ok(Json(json!({
        "success": true,
        "entities": count,
    })))
}
