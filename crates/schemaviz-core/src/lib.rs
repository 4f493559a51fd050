//! SchemaViz Core - Schema model and catalog introspection.
//!
//! This crate turns the metadata a SQL engine exposes through its
//! `information_schema` views into an ordered entity/attribute graph that a
//! rendering front end can draw as an entity-relationship diagram.

pub mod datatype;
pub mod error;
pub mod introspect;
pub mod model;

pub use datatype::{format_datatype, truncate_datatype};
pub use error::{Error, QueryError, Result, ValidationError, ValidationReason};
pub use introspect::{read_schema, read_schema_json, CatalogConnection, Row};
pub use model::{
    validate_entity, validate_snapshot, Attribute, Entity, ForeignKeyRef, Relationship,
    SchemaSnapshot, SnapshotBuilder,
};

#[cfg(feature = "sqlite")]
pub use introspect::sqlite::install_information_schema;
