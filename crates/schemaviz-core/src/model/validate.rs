//! Structural validation of untyped entity data.
//!
//! Any producer feeding the rendering surface goes through these functions,
//! whether the data came from the catalog reader or was built by hand. The
//! model types' serde derives define the accepted shape; this module tracks
//! where deserialization stopped and turns that into a [`ValidationError`].
//! Nothing is re-cased or cross-checked.

use super::{Entity, SchemaSnapshot};
use crate::error::{ValidationError, ValidationReason};
use serde::de::DeserializeOwned;
use serde_path_to_error::{Path, Segment};
use serde_json::Value;

/// Validate a single entity object.
pub fn validate_entity(value: &Value) -> Result<Entity, ValidationError> {
    deserialize_at_path(value)
}

/// Validate a mapping from entity key to entity object.
pub fn validate_snapshot(value: &Value) -> Result<SchemaSnapshot, ValidationError> {
    deserialize_at_path(value)
}

fn deserialize_at_path<T: DeserializeOwned>(value: &Value) -> Result<T, ValidationError> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = render_path(err.path());
        let message = err.into_inner().to_string();

        // serde reports a missing field against its parent object.
        if let Some(field) = missing_field(&message) {
            let err = ValidationError::new(field, ValidationReason::Missing);
            return if path.is_empty() { err } else { err.within(&path) };
        }
        ValidationError::new(path, classify(message))
    })
}

fn render_path(path: &Path) -> String {
    let mut out = String::new();
    for segment in path.iter() {
        match segment {
            Segment::Seq { index } => out.push_str(&format!("[{}]", index)),
            other => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(&other.to_string());
            }
        }
    }
    out
}

fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.strip_suffix('`'))
}

fn classify(message: String) -> ValidationReason {
    if message.starts_with("invalid type: null") {
        ValidationReason::Missing
    } else if message.ends_with("expected a string") {
        ValidationReason::ExpectedString
    } else if message.ends_with("expected a boolean") {
        ValidationReason::ExpectedBool
    } else if message.ends_with("expected a sequence") {
        ValidationReason::ExpectedArray
    } else if message.contains("expected struct") || message.contains("expected a map") {
        ValidationReason::ExpectedObject
    } else {
        ValidationReason::Invalid(message)
    }
}
