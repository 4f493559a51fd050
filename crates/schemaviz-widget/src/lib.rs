//! SchemaViz Widget - host side of the schema diagram
//!
//! This crate binds a schema snapshot and its presentation settings to any
//! number of attached views:
//! - Typed update/event channel instead of implicitly synced fields
//! - Attachment point for the `index.js`/`index.css` renderer bundle
//! - HTTP and WebSocket surface for browser-hosted views

pub mod assets;
pub mod channel;
pub mod config;
pub mod error;
pub mod routes;
pub mod source;
pub mod state;
pub mod widget;
pub mod ws;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use channel::{ViewEvent, ViewUpdate, WidgetState};
pub use config::WidgetConfig;
pub use widget::SchemaWidget;

use crate::state::AppState;

/// Create the Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::api::routes())
        .route("/ws", get(ws::ws_sync))
        .merge(routes::static_files::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
