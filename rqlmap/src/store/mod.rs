//! The boundary to the SQL store that executes generated statements.

mod sqlite;

pub use sqlite::SqliteClient;

use crate::error::{Result, RqlError};
use crate::value::receiver::describe;
use crate::value::{Receiver, Value};

/// Outcome of one write statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteResult {
    /// Set when the store rejected the statement; the counters are meaningless then
    pub error: Option<String>,
    pub rows_affected: u64,
    /// Identity assigned by an insert, 0 if none
    pub last_insert_id: i64,
}

/// Executes literal SQL statements.
///
/// `write` reports per-statement outcomes; an `Err` means the batch could not
/// be submitted at all.
pub trait StoreClient {
    fn write(&self, statements: &[String]) -> Result<Vec<WriteResult>>;

    fn query(&self, statements: &[String]) -> Result<Vec<RowSet>>;
}

/// Rows returned by one query, read with a cursor.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    cursor: Option<usize>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        RowSet {
            columns,
            rows,
            cursor: None,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Advance to the next row. Returns false once the rows are exhausted.
    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next.min(self.rows.len()));
        next < self.rows.len()
    }

    /// Decode the current row into `receivers`, positionally.
    pub fn scan(&self, receivers: &mut [&mut dyn Receiver]) -> Result<()> {
        let row = self
            .cursor
            .and_then(|c| self.rows.get(c))
            .ok_or_else(|| RqlError::decode("scan called without a current row"))?;
        if row.len() != receivers.len() {
            return Err(RqlError::Decode {
                message: format!(
                    "row has {} columns but {} receivers were given",
                    row.len(),
                    receivers.len()
                ),
                receivers: describe(receivers),
            });
        }
        for (i, (receiver, value)) in receivers.iter_mut().zip(row.iter()).enumerate() {
            receiver.receive(value.clone()).map_err(|e| match e {
                RqlError::Decode { message, .. } => RqlError::Decode {
                    message: format!("column {} ({}): {}", i, self.column_name(i), message),
                    receivers: String::new(),
                },
                other => other,
            })?;
        }
        Ok(())
    }

    fn column_name(&self, i: usize) -> &str {
        self.columns.get(i).map(String::as_str).unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_set() -> RowSet {
        RowSet::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![Value::Integer(1), Value::Text("abc".into())],
                vec![Value::Integer(2), Value::Text("def".into())],
            ],
        )
    }

    #[test]
    fn test_cursor() {
        let mut rows = row_set();
        let mut seen = Vec::new();
        while rows.next() {
            let mut id = 0i64;
            let mut name = String::new();
            rows.scan(&mut [&mut id as &mut dyn Receiver, &mut name]).unwrap();
            seen.push((id, name));
        }
        assert_eq!(seen, vec![(1, "abc".to_string()), (2, "def".to_string())]);
        assert!(!rows.next());
    }

    #[test]
    fn test_scan_without_row() {
        let rows = row_set();
        let mut id = 0i64;
        assert!(rows.scan(&mut [&mut id as &mut dyn Receiver]).is_err());
    }

    #[test]
    fn test_scan_shape_mismatch() {
        let mut rows = row_set();
        assert!(rows.next());
        let mut id = 0i64;
        let err = rows.scan(&mut [&mut id as &mut dyn Receiver]).unwrap_err();
        match err {
            RqlError::Decode { receivers, .. } => assert_eq!(receivers, "0:i64:0"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_scan_type_mismatch_names_column() {
        let mut rows = RowSet::new(vec!["kind".into()], vec![vec![Value::Text("x".into())]]);
        assert!(rows.next());
        let mut kind = 0i32;
        let err = rows.scan(&mut [&mut kind as &mut dyn Receiver]).unwrap_err();
        assert!(err.to_string().contains("column 0 (kind)"));
    }
}
