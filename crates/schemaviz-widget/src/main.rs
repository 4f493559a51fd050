use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schemaviz_widget::{
    assets::FrontendAssets,
    config::{Args, ServeConfig, WidgetConfig},
    create_router,
    source::{SnapshotSource, SqliteSource},
    state::AppState,
    SchemaWidget,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging (stderr, so --json output stays clean)
    let log_filter = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "schemaviz={0},schemaviz_widget={0},schemaviz_core={0},tower_http=info",
                    log_filter
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut source = SqliteSource::open(&args.database)?;

    if args.json {
        let snapshot = source.read()?;
        let out = if args.pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        println!("{}", out);
        return Ok(());
    }

    let serve: ServeConfig = (&args).into();
    let widget = SchemaWidget::new(WidgetConfig::from(&args)).with_source(source);
    let entities = tokio::task::block_in_place(|| widget.refresh())?;
    tracing::info!(database = %args.database.display(), entities, "Loaded schema");

    let assets = FrontendAssets::new(serve.assets_dir.clone());
    if !assets.is_built() {
        tracing::warn!(
            "No renderer bundle at {}, serving placeholder page",
            assets.esm_path().display()
        );
    }

    let state = AppState::new(widget, assets);
    let app = create_router(state);

    let listen_addr = serve.listen_addr();
    let base_url = serve.base_url();
    let listener = TcpListener::bind(&listen_addr).await?;

    tracing::info!("SchemaViz starting on {}", base_url);
    tracing::info!("Schema available at {}/api/entities", base_url);

    if serve.open_browser {
        tracing::info!("Opening browser...");
        if let Err(e) = open::that(&base_url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    println!();
    println!("  SchemaViz is running at {}", base_url);
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
