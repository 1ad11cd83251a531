//! Embedded store driver over SQLite.

use confrow_core::Value;
use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{Connection, Statement, params_from_iter};

use crate::connection::StoreConnection;
use crate::error::StoreError;
use crate::profile::EngineKind;
use crate::row::Row;

pub(crate) struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `path`.
    pub(crate) fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }
}

fn bind(value: &Value) -> Result<SqliteValue, StoreError> {
    Ok(match value {
        Value::Null => SqliteValue::Null,
        Value::Bool(b) => SqliteValue::Integer(i64::from(*b)),
        Value::Integer(n) => SqliteValue::Integer(*n),
        Value::Float(f) => SqliteValue::Real(*f),
        Value::String(s) => SqliteValue::Text(s.clone()),
        Value::Binary(bytes) => SqliteValue::Blob(bytes.clone()),
        other => return Err(StoreError::UnsupportedParameter(other.kind())),
    })
}

fn bind_all(params: &[Value]) -> Result<Vec<SqliteValue>, StoreError> {
    params.iter().map(bind).collect()
}

fn cell(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Integer(n),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::String(text.to_string()),
            Err(_) => Value::Binary(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => Value::Binary(bytes.to_vec()),
    }
}

fn column_labels(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn read_row(row: &rusqlite::Row<'_>, labels: &[String]) -> Result<Row, StoreError> {
    let mut out = Row::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        out.push(label.clone(), cell(row.get_ref(i)?));
    }
    Ok(out)
}

impl StoreConnection for SqliteStore {
    fn engine(&self) -> EngineKind {
        EngineKind::Embedded
    }

    fn query_first(&mut self, sql: &str, params: &[Value]) -> Result<Option<Row>, StoreError> {
        let bound = bind_all(params)?;
        let mut stmt = self.conn.prepare(sql)?;
        let labels = column_labels(&stmt);
        let mut rows = stmt.query(params_from_iter(bound))?;
        match rows.next()? {
            Some(row) => Ok(Some(read_row(row, &labels)?)),
            None => Ok(None),
        }
    }

    fn query_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        let bound = bind_all(params)?;
        let mut stmt = self.conn.prepare(sql)?;
        let labels = column_labels(&stmt);
        let mut rows = stmt.query(params_from_iter(bound))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(read_row(row, &labels)?);
        }
        Ok(out)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        let bound = bind_all(params)?;
        let changed = self.conn.execute(sql, params_from_iter(bound))?;
        Ok(changed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> SqliteStore {
        let store = SqliteStore::open(":memory:").unwrap();
        store
            .conn
            .execute_batch(
                "CREATE TABLE t (id INTEGER PRIMARY KEY, label TEXT, score REAL, raw BLOB);
                 INSERT INTO t VALUES (1, 'one', 1.5, x'00ff');
                 INSERT INTO t VALUES (2, NULL, NULL, NULL);",
            )
            .unwrap();
        store
    }

    #[test]
    fn test_cells_map_to_scalar_values() {
        let mut store = memory_store();
        let row = store
            .query_first("SELECT * FROM t WHERE id = ?", &[Value::from(1)])
            .unwrap()
            .unwrap();
        assert_eq!(row.columns().collect::<Vec<_>>(), ["id", "label", "score", "raw"]);
        assert_eq!(row.get("id"), Some(&Value::Integer(1)));
        assert_eq!(row.get("label"), Some(&Value::from("one")));
        assert_eq!(row.get("score"), Some(&Value::Float(1.5)));
        assert_eq!(row.get("raw"), Some(&Value::Binary(vec![0x00, 0xff])));

        let nulls = store
            .query_first("SELECT label FROM t WHERE id = ?", &[Value::from(2)])
            .unwrap()
            .unwrap();
        assert_eq!(nulls.get("label"), Some(&Value::Null));
    }

    #[test]
    fn test_bool_binds_as_integer() {
        let mut store = memory_store();
        let changed = store
            .execute("UPDATE t SET raw = ? WHERE id = ?", &[Value::Bool(true), Value::from(2)])
            .unwrap();
        assert_eq!(changed, 1);
        let rows = store.query_all("SELECT raw FROM t WHERE id = 2", &[]).unwrap();
        assert_eq!(rows[0].get("raw"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_nested_parameter_rejected() {
        let mut store = memory_store();
        let err = store
            .query_first("SELECT * FROM t WHERE id = ?", &[Value::Sequence(vec![])])
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedParameter(_)));
    }
}
