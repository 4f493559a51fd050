//! The schema widget: synced state plus the channel that carries it.

use parking_lot::{Mutex, RwLock};
use schemaviz_core::{validate_snapshot, SchemaSnapshot};
use tokio::sync::broadcast;

use crate::channel::{ViewEvent, ViewUpdate, WidgetState};
use crate::config::WidgetConfig;
use crate::error::{Result, WidgetError};
use crate::source::SnapshotSource;

/// Buffered updates per subscriber before it is considered lagging.
const UPDATE_BUFFER: usize = 64;

/// Widget state shared between the host and any number of views.
///
/// Every setter publishes exactly one [`ViewUpdate`]. Views that fall behind
/// should resynchronize from [`SchemaWidget::state`].
pub struct SchemaWidget {
    state: RwLock<WidgetState>,
    updates: broadcast::Sender<ViewUpdate>,
    source: Option<Mutex<Box<dyn SnapshotSource>>>,
}

impl SchemaWidget {
    pub fn new(config: WidgetConfig) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self {
            state: RwLock::new(WidgetState {
                entities: SchemaSnapshot::default(),
                config,
                value: 0,
            }),
            updates,
            source: None,
        }
    }

    /// Attach the source that `refresh` reads from.
    pub fn with_source(mut self, source: impl SnapshotSource + 'static) -> Self {
        self.source = Some(Mutex::new(Box::new(source)));
        self
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Current state, cloned.
    pub fn state(&self) -> WidgetState {
        self.state.read().clone()
    }

    pub fn entities(&self) -> SchemaSnapshot {
        self.state.read().entities.clone()
    }

    pub fn config(&self) -> WidgetConfig {
        self.state.read().config.clone()
    }

    pub fn value(&self) -> i64 {
        self.state.read().value
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewUpdate> {
        self.updates.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.updates.receiver_count()
    }

    pub fn set_entities(&self, entities: SchemaSnapshot) {
        let mut state = self.state.write();
        state.entities = entities.clone();
        self.publish(ViewUpdate::Entities { entities });
    }

    /// Validate a hand-built entity collection and show it.
    pub fn set_entities_json(&self, value: &serde_json::Value) -> Result<()> {
        let entities = validate_snapshot(value)?;
        self.set_entities(entities);
        Ok(())
    }

    pub fn set_config(&self, config: WidgetConfig) {
        let mut state = self.state.write();
        state.config = config.clone();
        self.publish(ViewUpdate::Config { config });
    }

    pub fn set_value(&self, value: i64) {
        let mut state = self.state.write();
        state.value = value;
        self.publish(ViewUpdate::Value { value });
    }

    /// Read the catalog once and publish the result. Returns the entity count.
    ///
    /// Blocks on the source; call from a blocking context. The source stays
    /// locked until the snapshot is published, so overlapping refreshes land
    /// in the order they read.
    pub fn refresh(&self) -> Result<usize> {
        let source = self.source.as_ref().ok_or(WidgetError::NoSource)?;
        let mut source = source.lock();
        let snapshot = source.read()?;
        let count = snapshot.len();
        tracing::info!(entities = count, "Refreshed schema");
        self.set_entities(snapshot);
        Ok(count)
    }

    /// Apply an event received from a view.
    pub fn apply_event(&self, event: ViewEvent) -> Result<()> {
        tracing::debug!(?event, "View event");
        match event {
            ViewEvent::SetValue { value } => {
                self.set_value(value);
                Ok(())
            }
            ViewEvent::Refresh => self.refresh().map(|_| ()),
        }
    }

    /// Callers hold the state write guard, so updates go out in the same
    /// order the state changed.
    fn publish(&self, update: ViewUpdate) {
        // No subscribers is fine: the next view to attach gets the full state.
        let _ = self.updates.send(update);
    }
}

impl Default for SchemaWidget {
    fn default() -> Self {
        Self::new(WidgetConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaviz_core::{Attribute, Entity, QueryError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn users() -> SchemaSnapshot {
        [Entity::new("users").with_attribute(Attribute::new("id", "INTEGER"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_setters_publish_one_update_each() {
        let widget = SchemaWidget::default();
        let mut rx = widget.subscribe();

        widget.set_value(5);
        widget.set_config(WidgetConfig {
            show_datatypes: false,
            ..WidgetConfig::default()
        });
        widget.set_entities(users());

        assert_eq!(rx.try_recv().unwrap(), ViewUpdate::Value { value: 5 });
        assert!(matches!(rx.try_recv().unwrap(), ViewUpdate::Config { config } if !config.show_datatypes));
        assert!(matches!(rx.try_recv().unwrap(), ViewUpdate::Entities { entities } if entities.len() == 1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_config_passes_through_unmodified() {
        let config = WidgetConfig {
            width: 1,
            height: 2,
            show_datatypes: false,
            datatype_max_length: 0,
        };
        let widget = SchemaWidget::new(config.clone());
        assert_eq!(widget.config(), config);
        assert_eq!(widget.state().config, config);
    }

    #[test]
    fn test_refresh_reads_exactly_once() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = reads.clone();
        let widget = SchemaWidget::default().with_source(move || -> schemaviz_core::Result<SchemaSnapshot> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(users())
        });

        assert_eq!(widget.refresh().unwrap(), 1);
        widget.apply_event(ViewEvent::Refresh).unwrap();

        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert!(widget.entities().contains("users"));
    }

    #[test]
    fn test_failed_refresh_keeps_previous_entities() {
        let widget = SchemaWidget::default().with_source(|| -> schemaviz_core::Result<SchemaSnapshot> {
            Err(QueryError::new("columns", "database is locked").into())
        });
        widget.set_entities(users());

        let err = widget.refresh().unwrap_err();
        assert!(matches!(
            err,
            WidgetError::Catalog(schemaviz_core::Error::Query(_))
        ));
        assert_eq!(widget.entities().len(), 1);
    }

    #[test]
    fn test_concurrent_setters_publish_in_state_order() {
        let widget = SchemaWidget::default();
        let mut rx = widget.subscribe();

        std::thread::scope(|scope| {
            for t in 0..4i64 {
                let widget = &widget;
                scope.spawn(move || {
                    for i in 0..20 {
                        widget.set_value(t * 100 + i);
                    }
                });
            }
        });

        let mut last = None;
        loop {
            match rx.try_recv() {
                Ok(ViewUpdate::Value { value }) => last = Some(value),
                Ok(other) => panic!("unexpected update {:?}", other),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        assert_eq!(last, Some(widget.value()));
    }

    #[test]
    fn test_overlapping_refreshes_keep_latest_read() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = reads.clone();
        let widget = SchemaWidget::default().with_source(move || -> schemaviz_core::Result<SchemaSnapshot> {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok([Entity::new(format!("gen_{}", n))].into_iter().collect())
        });

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let widget = &widget;
                scope.spawn(move || {
                    for _ in 0..10 {
                        widget.refresh().unwrap();
                    }
                });
            }
        });

        assert_eq!(reads.load(Ordering::SeqCst), 40);
        assert_eq!(widget.entities().names().collect::<Vec<_>>(), vec!["gen_39"]);
    }

    #[test]
    fn test_refresh_without_source() {
        let widget = SchemaWidget::default();
        assert!(matches!(widget.refresh(), Err(WidgetError::NoSource)));
    }

    #[test]
    fn test_set_value_event() {
        let widget = SchemaWidget::default();
        widget
            .apply_event(ViewEvent::SetValue { value: 42 })
            .unwrap();
        assert_eq!(widget.value(), 42);
    }

    #[test]
    fn test_set_entities_json_validates() {
        let widget = SchemaWidget::default();
        let err = widget
            .set_entities_json(&json!({"users": {"name": "users"}}))
            .unwrap_err();
        assert!(matches!(
            err,
            WidgetError::Catalog(schemaviz_core::Error::Validation(_))
        ));

        widget
            .set_entities_json(&json!({"users": {"name": "users", "attributes": []}}))
            .unwrap();
        assert!(widget.entities().contains("users"));
    }
}
