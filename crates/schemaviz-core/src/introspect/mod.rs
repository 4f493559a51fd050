//! Catalog introspection over ANSI `information_schema` views.
//!
//! The reader issues two read-only metadata queries on a caller-owned
//! connection and joins them into a [`SchemaSnapshot`](crate::SchemaSnapshot).
//! Engines plug in through [`CatalogConnection`].

mod queries;
mod reader;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use queries::{columns_query, foreign_keys_query};
pub use reader::{read_schema, read_schema_json};

use crate::error::QueryError;

/// One result row, every cell rendered as nullable text.
pub type Row = Vec<Option<String>>;

/// A live, read-only connection to a SQL engine.
///
/// The connection is owned by the caller; the reader assumes exclusive use of
/// it for the duration of one call and never opens or closes it.
pub trait CatalogConnection {
    /// Execute a read-only statement and return all of its rows.
    fn query_rows(&self, sql: &str) -> Result<Vec<Row>, QueryError>;

    /// The engine's conventional default schema.
    fn default_schema(&self) -> &str {
        "main"
    }
}

impl<C: CatalogConnection + ?Sized> CatalogConnection for &C {
    fn query_rows(&self, sql: &str) -> Result<Vec<Row>, QueryError> {
        (**self).query_rows(sql)
    }

    fn default_schema(&self) -> &str {
        (**self).default_schema()
    }
}
