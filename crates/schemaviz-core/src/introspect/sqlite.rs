//! SQLite backend.
//!
//! SQLite has no `information_schema`, so [`install_information_schema`]
//! attaches an in-memory database under that name and materializes the four
//! views the reader needs from `sqlite_master` and the table-valued pragmas.
//! The projection is read-only with respect to `main`.
//!
//! Foreign keys are projected one column at a time. A composite key
//! `FOREIGN KEY (a, b) REFERENCES p (x, y)` becomes the single-column
//! constraints `a -> p.x` and `b -> p.y`, because the reader joins key and
//! referenced columns on the constraint name alone. A key column whose parent
//! column cannot be resolved (implicit reference to a table without a
//! declared primary key, or to a missing table) is left out.

use super::{CatalogConnection, Row};
use crate::error::QueryError;
use rusqlite::types::ValueRef;
use rusqlite::Connection;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS information_schema.columns (
    table_catalog TEXT,
    table_schema TEXT,
    table_name TEXT,
    column_name TEXT,
    ordinal_position INTEGER,
    data_type TEXT,
    is_nullable TEXT
);
CREATE TABLE IF NOT EXISTS information_schema.table_constraints (
    constraint_schema TEXT,
    constraint_name TEXT,
    table_schema TEXT,
    table_name TEXT,
    constraint_type TEXT
);
CREATE TABLE IF NOT EXISTS information_schema.key_column_usage (
    constraint_schema TEXT,
    constraint_name TEXT,
    table_schema TEXT,
    table_name TEXT,
    column_name TEXT,
    ordinal_position INTEGER,
    position_in_unique_constraint INTEGER
);
CREATE TABLE IF NOT EXISTS information_schema.constraint_column_usage (
    constraint_schema TEXT,
    constraint_name TEXT,
    table_schema TEXT,
    table_name TEXT,
    column_name TEXT
);
"#;

/// One row per resolvable foreign key column, with its projected constraint
/// name. Prefixed to each insert below.
const FOREIGN_KEY_COLUMNS: &str = r#"
WITH fk AS (
    SELECT m.name AS table_name,
           f.id AS id,
           f.seq AS seq,
           f."from" AS column_name,
           f."table" AS parent_table,
           COALESCE(f."to", (
               SELECT p.name FROM pragma_table_info(f."table", 'main') AS p
               WHERE p.pk = f.seq + 1
           )) AS parent_column,
           (
               SELECT COUNT(*) FROM pragma_foreign_key_list(m.name, 'main') AS g
               WHERE g.id = f.id
           ) AS width
    FROM main.sqlite_master AS m, pragma_foreign_key_list(m.name, 'main') AS f
    WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%'
),
fk_columns AS (
    SELECT table_name, seq, column_name, parent_table, parent_column,
           'fk_' || table_name || '_' || id
               || CASE WHEN width > 1 THEN '_' || (seq + 1) ELSE '' END AS constraint_name
    FROM fk
    WHERE parent_column IS NOT NULL
)
"#;

const REFRESH_COLUMNS: &str = r#"
DELETE FROM information_schema.columns;
DELETE FROM information_schema.table_constraints;
DELETE FROM information_schema.key_column_usage;
DELETE FROM information_schema.constraint_column_usage;

INSERT INTO information_schema.columns
SELECT 'main', 'main', m.name, p.name, p.cid + 1, p.type,
       CASE p."notnull" WHEN 0 THEN 'YES' ELSE 'NO' END
FROM main.sqlite_master AS m, pragma_table_info(m.name, 'main') AS p
WHERE m.type IN ('table', 'view') AND m.name NOT LIKE 'sqlite_%';
"#;

const INSERT_TABLE_CONSTRAINTS: &str = r#"
INSERT INTO information_schema.table_constraints
SELECT DISTINCT 'main', constraint_name, 'main', table_name, 'FOREIGN KEY'
FROM fk_columns;
"#;

const INSERT_KEY_COLUMN_USAGE: &str = r#"
INSERT INTO information_schema.key_column_usage
SELECT 'main', constraint_name, 'main', table_name, column_name, 1, seq + 1
FROM fk_columns;
"#;

const INSERT_CONSTRAINT_COLUMN_USAGE: &str = r#"
INSERT INTO information_schema.constraint_column_usage
SELECT 'main', constraint_name, 'main', parent_table, parent_column
FROM fk_columns;
"#;

fn refresh_sql() -> String {
    let mut sql = String::from(REFRESH_COLUMNS);
    for insert in [
        INSERT_TABLE_CONSTRAINTS,
        INSERT_KEY_COLUMN_USAGE,
        INSERT_CONSTRAINT_COLUMN_USAGE,
    ] {
        sql.push_str(FOREIGN_KEY_COLUMNS);
        sql.push_str(insert);
    }
    sql
}

/// Attach (or refresh) the `information_schema` projection on `conn`.
///
/// Call again after DDL to pick up schema changes. Foreign key constraints,
/// which SQLite leaves unnamed, are named `fk_<table>_<id>`; each column of a
/// composite key gets its own `fk_<table>_<id>_<position>`.
pub fn install_information_schema(conn: &Connection) -> Result<(), QueryError> {
    let attached: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM pragma_database_list WHERE name = 'information_schema')",
            [],
            |row| row.get(0),
        )
        .map_err(|e| QueryError::from(e).with_context("information_schema"))?;

    if !attached {
        conn.execute_batch("ATTACH DATABASE ':memory:' AS information_schema")
            .map_err(|e| QueryError::from(e).with_context("information_schema"))?;
        tracing::debug!("Attached information_schema projection");
    }

    conn.execute_batch(CREATE_TABLES)
        .and_then(|_| conn.execute_batch(&refresh_sql()))
        .map_err(|e| QueryError::from(e).with_context("information_schema"))
}

impl CatalogConnection for Connection {
    fn query_rows(&self, sql: &str) -> Result<Vec<Row>, QueryError> {
        let mut stmt = self.prepare(sql)?;
        if !stmt.readonly() {
            return Err(QueryError::new("sqlite", "refusing to run a writing statement"));
        }

        let width = stmt.column_count();
        let rows = stmt.query_map([], |row| {
            (0..width)
                .map(|i| row.get_ref(i).map(cell_text))
                .collect::<rusqlite::Result<Row>>()
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn cell_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::read_schema;
    use crate::model::ForeignKeyRef;

    fn blog_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
            CREATE TABLE posts (
                id INTEGER PRIMARY KEY,
                title varchar(200),
                author_id INTEGER REFERENCES users(id)
            );
            CREATE TABLE comments (
                id INTEGER,
                post_id INTEGER,
                note,
                FOREIGN KEY (post_id) REFERENCES posts
            );
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_query_rows_renders_cells_as_text() {
        let conn = Connection::open_in_memory().unwrap();
        let rows = conn.query_rows("SELECT 1, 'a', NULL, 2.5").unwrap();
        assert_eq!(
            rows,
            vec![vec![
                Some("1".to_string()),
                Some("a".to_string()),
                None,
                Some("2.5".to_string())
            ]]
        );
    }

    #[test]
    fn test_query_rows_rejects_writes() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn.query_rows("CREATE TABLE t (a INT)").unwrap_err();
        assert!(err.message.contains("writing"));
    }

    #[test]
    fn test_reader_over_projection() {
        let conn = blog_db();
        install_information_schema(&conn).unwrap();

        let snapshot = read_schema(&conn).unwrap();
        assert_eq!(
            snapshot.names().collect::<Vec<_>>(),
            vec!["comments", "posts", "users"]
        );

        let posts = snapshot.get("posts").unwrap();
        assert_eq!(posts.attributes[1].datatype, "VARCHAR(200)");
        assert_eq!(
            posts.attributes[2].foreign_key,
            Some(ForeignKeyRef::new("users", "id"))
        );

        // Implicit parent key resolves to the referenced primary key.
        let comments = snapshot.get("comments").unwrap();
        assert_eq!(
            comments.attributes[1].foreign_key,
            Some(ForeignKeyRef::new("posts", "id"))
        );
        // Undeclared type comes through as an empty string.
        assert_eq!(comments.attributes[2].datatype, "");
    }

    #[test]
    fn test_unresolvable_parent_column_is_skipped() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE p (x TEXT);
            CREATE TABLE c (pid INTEGER REFERENCES p, gone INTEGER REFERENCES missing);
            "#,
        )
        .unwrap();
        install_information_schema(&conn).unwrap();

        let snapshot = read_schema(&conn).unwrap();
        let c = snapshot.get("c").unwrap();
        assert_eq!(c.attributes.len(), 2);
        assert!(c.attributes.iter().all(|a| a.foreign_key.is_none()));
    }

    #[test]
    fn test_composite_key_pairs_columns_by_position() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE p (x INTEGER, y INTEGER, PRIMARY KEY (x, y));
            CREATE TABLE c (
                a INTEGER,
                b INTEGER,
                FOREIGN KEY (a, b) REFERENCES p (x, y)
            );
            CREATE TABLE d (
                a INTEGER,
                b INTEGER,
                FOREIGN KEY (a, b) REFERENCES p
            );
            "#,
        )
        .unwrap();
        install_information_schema(&conn).unwrap();

        let snapshot = read_schema(&conn).unwrap();
        for table in ["c", "d"] {
            let entity = snapshot.get(table).unwrap();
            assert_eq!(
                entity.attributes[0].foreign_key,
                Some(ForeignKeyRef::new("p", "x"))
            );
            assert_eq!(
                entity.attributes[1].foreign_key,
                Some(ForeignKeyRef::new("p", "y"))
            );
        }
    }

    #[test]
    fn test_reinstall_picks_up_ddl() {
        let conn = blog_db();
        install_information_schema(&conn).unwrap();
        conn.execute_batch("CREATE TABLE tags (id INTEGER, label TEXT)")
            .unwrap();

        assert!(!read_schema(&conn).unwrap().contains("tags"));

        install_information_schema(&conn).unwrap();
        let snapshot = read_schema(&conn).unwrap();
        assert_eq!(snapshot.get("tags").unwrap().attributes.len(), 2);
        assert_eq!(snapshot.len(), 4);
    }
}
