//! Entity/attribute model handed to the rendering surface.
//!
//! The model is the wire contract between the data layer and any front end:
//! a snapshot is an ordered mapping from table name to [`Entity`], and each
//! entity carries its columns as ordered [`Attribute`]s.

mod attribute;
mod entity;
mod snapshot;
mod validate;

pub use attribute::{Attribute, ForeignKeyRef};
pub use entity::Entity;
pub use snapshot::{Relationship, SchemaSnapshot, SnapshotBuilder};
pub use validate::{validate_entity, validate_snapshot};
