//! Entity definitions.

use super::attribute::Attribute;
use serde::{Deserialize, Serialize};

/// A table: name plus attributes in ordinal-position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name (unique within a snapshot).
    pub name: String,
    /// Attributes in display order.
    pub attributes: Vec<Attribute>,
}

impl Entity {
    /// Create an entity with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute to the entity.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add multiple attributes.
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attributes that carry a foreign key reference.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_foreign_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForeignKeyRef;

    #[test]
    fn test_entity_builder() {
        let orders = Entity::new("orders")
            .with_attribute(Attribute::new("id", "INTEGER"))
            .with_attribute(
                Attribute::new("user_id", "INTEGER")
                    .with_foreign_key(ForeignKeyRef::new("users", "id")),
            );

        assert_eq!(orders.name, "orders");
        assert_eq!(orders.attributes.len(), 2);
        assert_eq!(orders.foreign_keys().count(), 1);
    }

    #[test]
    fn test_get_attribute() {
        let users = Entity::new("users").with_attributes([
            Attribute::new("id", "INTEGER"),
            Attribute::new("name", "TEXT"),
        ]);

        assert!(users.attribute("id").is_some());
        assert!(users.attribute("nonexistent").is_none());
        assert_eq!(users.attributes[1].name, "name");
    }
}
