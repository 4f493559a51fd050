use crate::assets::FrontendAssets;
use crate::error::{Result, WidgetError};
use crate::widget::SchemaWidget;
use std::sync::Arc;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub widget: Arc<SchemaWidget>,
    pub assets: FrontendAssets,
}

impl AppState {
    pub fn new(widget: SchemaWidget, assets: FrontendAssets) -> Self {
        Self {
            widget: Arc::new(widget),
            assets,
        }
    }

    /// Run one catalog refresh off the async runtime.
    pub async fn refresh(&self) -> Result<usize> {
        let widget = self.widget.clone();
        tokio::task::spawn_blocking(move || widget.refresh())
            .await
            .map_err(|e| WidgetError::Internal(e.to_string()))?
    }
}
