//! Schema snapshot - the full entity mapping produced by one introspection.

use super::Entity;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Ordered mapping from entity name to [`Entity`].
///
/// Keys keep first-seen insertion order, and the JSON form lists them in the
/// same order. A snapshot is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    entries: Vec<(String, Entity)>,
    index: HashMap<String, usize>,
}

/// A foreign key edge between two entities.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Relationship {
    pub from_entity: String,
    pub from_attribute: String,
    pub to_entity: String,
    pub to_attribute: String,
}

impl SchemaSnapshot {
    /// Start building a snapshot.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Get an entity by key.
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Check whether an entity key is present.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entity keys in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All foreign key edges, in entity then attribute order.
    pub fn relationships(&self) -> Vec<Relationship> {
        self.iter()
            .flat_map(|(name, entity)| {
                entity.foreign_keys().filter_map(move |attr| {
                    attr.foreign_key.as_ref().map(|fk| Relationship {
                        from_entity: name.to_string(),
                        from_attribute: attr.name.clone(),
                        to_entity: fk.entity.clone(),
                        to_attribute: fk.attribute.clone(),
                    })
                })
            })
            .collect()
    }

    /// Foreign keys whose target entity or attribute is not in this snapshot.
    ///
    /// Diagnostic only: references are a best-effort projection of what the
    /// engine reports and are never rejected.
    pub fn dangling_references(&self) -> Vec<Relationship> {
        self.relationships()
            .into_iter()
            .filter(|rel| {
                self.get(&rel.to_entity)
                    .and_then(|target| target.attribute(&rel.to_attribute))
                    .is_none()
            })
            .collect()
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Serialize for SchemaSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entity) in &self.entries {
            map.serialize_entry(name, entity)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SchemaSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = SchemaSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of entity names to entities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut builder = SchemaSnapshot::builder();
                while let Some((key, entity)) = map.next_entry::<String, Entity>()? {
                    builder.insert(key, entity);
                }
                Ok(builder.build())
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

/// Accumulates entities in first-seen order.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    entries: Vec<(String, Entity)>,
    index: HashMap<String, usize>,
}

impl SnapshotBuilder {
    /// Get the entity for `name`, creating an empty one on first sight.
    pub fn entity_mut(&mut self, name: &str) -> &mut Entity {
        let idx = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.entries.push((name.to_string(), Entity::new(name)));
                self.index.insert(name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Insert an entity under `key`, replacing any earlier one in place.
    pub fn insert(&mut self, key: impl Into<String>, entity: Entity) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = entity,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, entity));
            }
        }
    }

    /// Add an entity keyed by its own name.
    pub fn with_entity(mut self, entity: Entity) -> Self {
        let key = entity.name.clone();
        self.insert(key, entity);
        self
    }

    pub fn build(self) -> SchemaSnapshot {
        SchemaSnapshot {
            entries: self.entries,
            index: self.index,
        }
    }
}

impl FromIterator<Entity> for SchemaSnapshot {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SchemaSnapshot::builder(), SnapshotBuilder::with_entity)
            .build()
    }
}
