//! Attribute definitions.

use serde::{Deserialize, Deserializer, Serialize};

/// Reference from an attribute to another entity's attribute, by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referenced entity (table) name.
    pub entity: String,
    /// Referenced attribute (column) name.
    pub attribute: String,
}

impl ForeignKeyRef {
    pub fn new(entity: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            attribute: attribute.into(),
        }
    }
}

/// One column of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Column name (unique within its entity).
    pub name: String,
    /// Engine-reported type name.
    pub datatype: String,
    /// Primary key flag. The catalog reader never sets this.
    #[serde(default, deserialize_with = "null_as_false")]
    pub primary_key: bool,
    /// Foreign key target, serialized as `null` when absent.
    #[serde(default)]
    pub foreign_key: Option<ForeignKeyRef>,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl Attribute {
    /// Create a plain attribute with no key flags.
    pub fn new(name: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datatype: datatype.into(),
            primary_key: false,
            foreign_key: None,
        }
    }

    /// Mark as primary key.
    pub fn with_primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Attach a foreign key reference.
    pub fn with_foreign_key(mut self, foreign_key: ForeignKeyRef) -> Self {
        self.foreign_key = Some(foreign_key);
        self
    }

    /// Check if this attribute references another entity.
    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_builder() {
        let attr = Attribute::new("user_id", "INTEGER")
            .with_foreign_key(ForeignKeyRef::new("users", "id"));

        assert_eq!(attr.name, "user_id");
        assert!(!attr.primary_key);
        assert!(attr.is_foreign_key());
    }

    #[test]
    fn test_absent_foreign_key_serializes_as_null() {
        let attr = Attribute::new("id", "INTEGER");
        assert_eq!(
            serde_json::to_value(&attr).unwrap(),
            json!({"name": "id", "datatype": "INTEGER", "primary_key": false, "foreign_key": null})
        );
    }

    #[test]
    fn test_deserialize_fills_key_defaults() {
        let attr: Attribute =
            serde_json::from_value(json!({"name": "id", "datatype": "INTEGER", "primary_key": null}))
                .unwrap();
        assert_eq!(attr, Attribute::new("id", "INTEGER"));

        let attr: Attribute = serde_json::from_value(json!({
            "name": "user_id",
            "datatype": "INTEGER",
            "primary_key": true,
            "foreign_key": {"entity": "users", "attribute": "id"}
        }))
        .unwrap();
        assert!(attr.primary_key);
        assert_eq!(attr.foreign_key, Some(ForeignKeyRef::new("users", "id")));
    }
}
