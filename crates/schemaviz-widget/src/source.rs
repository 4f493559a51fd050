//! Where the widget gets its schema snapshots from.

use rusqlite::{Connection, OpenFlags};
use schemaviz_core::{install_information_schema, read_schema, SchemaSnapshot};
use std::path::Path;

/// Produces a fresh snapshot on every call.
pub trait SnapshotSource: Send {
    fn read(&mut self) -> schemaviz_core::Result<SchemaSnapshot>;
}

impl<F> SnapshotSource for F
where
    F: FnMut() -> schemaviz_core::Result<SchemaSnapshot> + Send,
{
    fn read(&mut self) -> schemaviz_core::Result<SchemaSnapshot> {
        self()
    }
}

/// A SQLite database read through the `information_schema` projection.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open an existing database file. Missing files are an error rather than
    /// silently created.
    pub fn open(path: &Path) -> schemaviz_core::Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            schemaviz_core::QueryError::from(e).with_context(path.display().to_string())
        })?;
        Ok(Self { conn })
    }

    /// Wrap a connection the caller already opened.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SnapshotSource for SqliteSource {
    fn read(&mut self) -> schemaviz_core::Result<SchemaSnapshot> {
        // Re-project on every read so DDL since the last refresh shows up.
        install_information_schema(&self.conn)?;
        read_schema(&self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteSource::open(&dir.path().join("absent.db"))
            .err()
            .unwrap();
        assert!(matches!(err, schemaviz_core::Error::Query(_)));
    }

    #[test]
    fn test_read_sees_later_ddl() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE a (id INTEGER)").unwrap();
        let mut source = SqliteSource::from_connection(conn);

        assert_eq!(source.read().unwrap().len(), 1);

        source
            .connection()
            .execute_batch("CREATE TABLE b (id INTEGER)")
            .unwrap();
        assert_eq!(source.read().unwrap().len(), 2);
    }
}
