use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::assets::{CSS_FILE, ESM_FILE};
use crate::error::Result;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(host_page))
        .route("/index.js", get(serve_esm))
        .route("/index.css", get(serve_css))
}

async fn serve_esm(State(state): State<AppState>) -> Result<Response> {
    serve_asset(&state, ESM_FILE).await
}

async fn serve_css(State(state): State<AppState>) -> Result<Response> {
    serve_asset(&state, CSS_FILE).await
}

async fn serve_asset(state: &AppState, name: &str) -> Result<Response> {
    let asset = state.assets.load(name).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, asset.content_type),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        Body::from(asset.bytes),
    )
        .into_response())
}

/// Page that mounts the renderer and wires it to `/ws`.
async fn host_page(State(state): State<AppState>) -> Response {
    if state.assets.is_built() {
        Html(HOST_PAGE).into_response()
    } else {
        Html(PLACEHOLDER_PAGE).into_response()
    }
}

// The model object mirrors the widget-model interface renderers expect:
// get/set/save_changes/on/off over the synced fields.
const HOST_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SchemaViz</title>
    <link rel="stylesheet" href="/index.css">
</head>
<body>
    <div id="schemaviz"></div>
    <script type="module">
        import widget from "/index.js";

        const fields = {};
        const handlers = {};
        const pending = [];
        const socket = new WebSocket(`ws://${location.host}/ws`);

        const emit = (name) => (handlers[name] || []).forEach((cb) => cb(fields[name.slice(7)]));
        const assign = (name, value) => { fields[name] = value; emit(`change:${name}`); };

        const model = {
            get: (name) => fields[name],
            set: (name, value) => { if (name === "value") { fields.value = value; pending.push(value); } },
            save_changes: () => {
                while (pending.length) {
                    socket.send(JSON.stringify({ type: "set_value", value: pending.shift() }));
                }
            },
            refresh: () => socket.send(JSON.stringify({ type: "refresh" })),
            on: (name, cb) => { (handlers[name] = handlers[name] || []).push(cb); },
            off: (name, cb) => { handlers[name] = (handlers[name] || []).filter((h) => h !== cb); },
        };

        let mounted = false;
        socket.onmessage = (msg) => {
            const update = JSON.parse(msg.data);
            switch (update.type) {
                case "state":
                    assign("entities", update.entities);
                    Object.entries(update.config).forEach(([k, v]) => assign(k, v));
                    assign("value", update.value);
                    if (!mounted) {
                        mounted = true;
                        widget.render({ model, el: document.getElementById("schemaviz") });
                    }
                    break;
                case "entities":
                    assign("entities", update.entities);
                    break;
                case "config":
                    Object.entries(update.config).forEach(([k, v]) => assign(k, v));
                    break;
                case "value":
                    assign("value", update.value);
                    break;
            }
        };
    </script>
</body>
</html>"#;

const PLACEHOLDER_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>SchemaViz</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 3rem; color: #222; }
        code { background: #f2f2f2; padding: 0.2rem 0.4rem; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>SchemaViz</h1>
    <p>The diagram renderer has not been built. Place <code>index.js</code> and
       <code>index.css</code> in the assets directory (see <code>--assets</code>).</p>
    <p>The schema is available at <a href="/api/entities">/api/entities</a>.</p>
</body>
</html>"#;
