//! Core error types.

use std::fmt;
use thiserror::Error;

/// Result alias for catalog and model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for schema introspection.
#[derive(Debug, Error)]
pub enum Error {
    /// A metadata query could not be executed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A row or assembled record did not match the entity model.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The underlying engine failed to run a metadata query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("query error ({context}): {message}")]
pub struct QueryError {
    /// Which metadata read failed (e.g. `columns`, `foreign keys`).
    pub context: String,
    /// Engine-reported message.
    pub message: String,
}

impl QueryError {
    /// Create a query error for the named metadata read.
    pub fn new(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Re-label the error with the metadata read it belongs to.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for QueryError {
    fn from(err: rusqlite::Error) -> Self {
        QueryError::new("sqlite", err.to_string())
    }
}

/// A value did not conform to the entity/attribute shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation error at `{path}`: {reason}")]
pub struct ValidationError {
    /// Path to the offending field, e.g. `attributes[1].foreign_key.entity`.
    pub path: String,
    /// What was wrong with it.
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }

    /// Prefix the path with an outer segment (`users` + `name` -> `users.name`).
    pub fn within(mut self, outer: &str) -> Self {
        self.path = if self.path.is_empty() {
            outer.to_string()
        } else if self.path.starts_with('[') {
            format!("{}{}", outer, self.path)
        } else {
            format!("{}.{}", outer, self.path)
        };
        self
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// Required field absent or null.
    Missing,
    /// Expected a string.
    ExpectedString,
    /// Expected a boolean.
    ExpectedBool,
    /// Expected an array.
    ExpectedArray,
    /// Expected an object.
    ExpectedObject,
    /// A result row had the wrong number of cells.
    WrongArity { expected: usize, found: usize },
    /// Any other shape mismatch, with the deserializer's message.
    Invalid(String),
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::Missing => f.write_str("missing field"),
            ValidationReason::ExpectedString => f.write_str("expected string"),
            ValidationReason::ExpectedBool => f.write_str("expected bool"),
            ValidationReason::ExpectedArray => f.write_str("expected array"),
            ValidationReason::ExpectedObject => f.write_str("expected object"),
            ValidationReason::WrongArity { expected, found } => {
                write!(f, "expected {} cells, found {}", expected, found)
            }
            ValidationReason::Invalid(message) => f.write_str(message),
        }
    }
}
