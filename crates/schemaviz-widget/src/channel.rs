//! Messages exchanged between the widget and its views.
//!
//! Updates flow from the data layer to every attached view; events flow
//! back. Both are JSON objects tagged by `type`.

use schemaviz_core::SchemaSnapshot;
use serde::{Deserialize, Serialize};

use crate::config::WidgetConfig;

/// Full widget state, sent to a view when it attaches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetState {
    pub entities: SchemaSnapshot,
    pub config: WidgetConfig,
    pub value: i64,
}

/// Data layer -> view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewUpdate {
    State(WidgetState),
    Entities { entities: SchemaSnapshot },
    Config { config: WidgetConfig },
    Value { value: i64 },
}

/// View -> data layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    /// The view changed the synced scalar.
    SetValue { value: i64 },
    /// The user asked for the catalog to be read again.
    Refresh,
}

impl ViewEvent {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
