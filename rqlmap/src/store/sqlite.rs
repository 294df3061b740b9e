use super::{RowSet, StoreClient, WriteResult};
use crate::error::Result;
use crate::value::Value;
use rusqlite::Connection;
use std::path::Path;

/// A [`StoreClient`] backed by an embedded SQLite database.
///
/// Each statement runs on its own, in autocommit mode, the way a statement
/// batch is applied by a remote SQLite-based store.
pub struct SqliteClient {
    conn: Connection,
}

impl SqliteClient {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// `fk` columns are only enforced with foreign keys switched on.
    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(SqliteClient { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn execute(&self, statement: &str) -> std::result::Result<WriteResult, rusqlite::Error> {
        let changed = self.conn.execute(statement, [])?;
        // last_insert_rowid is sticky across statements; only trust it for
        // a statement that actually inserted
        let last_insert_id = if changed > 0 && is_insert(statement) {
            self.conn.last_insert_rowid()
        } else {
            0
        };
        Ok(WriteResult {
            error: None,
            rows_affected: changed as u64,
            last_insert_id,
        })
    }

    fn select(&self, statement: &str) -> Result<RowSet> {
        let mut stmt = self.conn.prepare(statement)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = columns.len();

        let rows = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value: rusqlite::types::Value = row.get(i)?;
                values.push(Value::from(value));
            }
            Ok(values)
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(RowSet::new(columns, results))
    }
}

fn is_insert(statement: &str) -> bool {
    statement
        .trim_start()
        .get(..6)
        .map_or(false, |head| head.eq_ignore_ascii_case("insert"))
}

impl StoreClient for SqliteClient {
    fn write(&self, statements: &[String]) -> Result<Vec<WriteResult>> {
        let results = statements
            .iter()
            .map(|statement| {
                self.execute(statement).unwrap_or_else(|e| WriteResult {
                    error: Some(e.to_string()),
                    ..WriteResult::default()
                })
            })
            .collect();
        Ok(results)
    }

    fn query(&self, statements: &[String]) -> Result<Vec<RowSet>> {
        statements.iter().map(|s| self.select(s)).collect()
    }
}
