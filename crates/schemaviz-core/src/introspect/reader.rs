//! Catalog reader: joins column and foreign key metadata into entities.

use super::queries::{columns_query, foreign_keys_query};
use super::{CatalogConnection, Row};
use crate::error::{Result, ValidationError, ValidationReason};
use crate::model::{validate_entity, Attribute, ForeignKeyRef, SchemaSnapshot};
use std::collections::HashMap;

struct ColumnRow {
    table: String,
    column: String,
    data_type: String,
}

struct ForeignKeyRow {
    table: String,
    column: String,
    foreign_table: String,
    foreign_column: String,
}

/// Read every table in the connection's default schema.
///
/// Issues exactly two queries. Any query or validation failure fails the
/// whole call; no partial snapshot is returned.
pub fn read_schema<C: CatalogConnection + ?Sized>(conn: &C) -> Result<SchemaSnapshot> {
    let schema = conn.default_schema();

    let columns = conn
        .query_rows(&columns_query(schema))
        .map_err(|e| e.with_context("columns"))?;
    let columns = decode_rows(&columns, "columns", &COLUMN_FIELDS, |c| ColumnRow {
        table: c[0].to_string(),
        column: c[1].to_string(),
        data_type: c[2].to_string(),
    })?;

    let fks = conn
        .query_rows(&foreign_keys_query(schema))
        .map_err(|e| e.with_context("foreign keys"))?;
    let fks = decode_rows(&fks, "foreign_keys", &FOREIGN_KEY_FIELDS, |c| ForeignKeyRow {
        table: c[0].to_string(),
        column: c[1].to_string(),
        foreign_table: c[2].to_string(),
        foreign_column: c[3].to_string(),
    })?;

    let mut fk_map: HashMap<(String, String), ForeignKeyRef> = HashMap::with_capacity(fks.len());
    for fk in fks {
        fk_map.insert(
            (fk.table, fk.column),
            ForeignKeyRef::new(fk.foreign_table, fk.foreign_column),
        );
    }

    let column_count = columns.len();
    let mut builder = SchemaSnapshot::builder();
    for row in columns {
        let foreign_key = fk_map.get(&(row.table.clone(), row.column.clone())).cloned();
        let mut attribute = Attribute::new(row.column, row.data_type.to_uppercase());
        attribute.foreign_key = foreign_key;
        builder.entity_mut(&row.table).attributes.push(attribute);
    }

    let assembled = builder.build();
    let mut validated = SchemaSnapshot::builder();
    for (name, entity) in assembled.iter() {
        let value = serde_json::to_value(entity)?;
        let entity = validate_entity(&value).map_err(|e| e.within(name))?;
        validated.insert(name, entity);
    }
    let snapshot = validated.build();

    tracing::debug!(
        schema,
        tables = snapshot.len(),
        columns = column_count,
        foreign_keys = fk_map.len(),
        "Read catalog"
    );

    for rel in snapshot.dangling_references() {
        tracing::warn!(
            from = %format!("{}.{}", rel.from_entity, rel.from_attribute),
            to = %format!("{}.{}", rel.to_entity, rel.to_attribute),
            "Foreign key references an unknown entity or attribute"
        );
    }

    Ok(snapshot)
}

/// Read the catalog and return its JSON wire form.
pub fn read_schema_json<C: CatalogConnection + ?Sized>(conn: &C) -> Result<serde_json::Value> {
    Ok(read_schema(conn)?.to_json()?)
}

const COLUMN_FIELDS: [&str; 3] = ["table_name", "column_name", "data_type"];
const FOREIGN_KEY_FIELDS: [&str; 4] = ["table", "column", "foreign_table", "foreign_column"];

fn decode_rows<T, const N: usize>(
    rows: &[Row],
    source: &str,
    fields: &[&str; N],
    build: impl Fn([&str; N]) -> T,
) -> std::result::Result<Vec<T>, ValidationError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let at = |field: &str| format!("{}[{}].{}", source, i, field);
            if row.len() != N {
                return Err(ValidationError::new(
                    format!("{}[{}]", source, i),
                    ValidationReason::WrongArity {
                        expected: N,
                        found: row.len(),
                    },
                ));
            }
            let mut cells: [&str; N] = [""; N];
            for (slot, (cell, field)) in cells.iter_mut().zip(row.iter().zip(fields)) {
                *slot = cell
                    .as_deref()
                    .ok_or_else(|| ValidationError::new(at(field), ValidationReason::Missing))?;
            }
            Ok(build(cells))
        })
        .collect()
}
