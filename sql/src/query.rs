//! Primary-key reads.

use confrow_core::Value;
use tracing::debug;

use crate::connection::Connector;
use crate::convert::FromValue;
use crate::error::{Result, SqlError, StoreError};
use crate::row::Row;
use crate::statement::{bare_name, select_statement};
use crate::store::SqlStore;

/// Finds a requested column in a result row. Qualified or quoted names such
/// as `users.name` or `"order"` fall back to the bare label the store reports.
fn lookup<'r>(row: &'r Row, column: &str) -> Option<&'r Value> {
    row.get(column).or_else(|| row.get(bare_name(column)))
}

impl<C: Connector> SqlStore<C> {
    /// Reads the row whose `key_column` equals `key`.
    ///
    /// With an empty `columns` slice every column is selected and the row
    /// comes back in the store's column order. Otherwise the row holds
    /// exactly the requested columns, in the requested order, labeled as
    /// requested.
    ///
    /// Returns `Ok(None)` when no row matches. When the key is not unique
    /// and several rows match, only the first row the store returns is used.
    ///
    /// # Errors
    ///
    /// - [`SqlError::InvalidIdentifier`] for a malformed table or column name
    /// - [`SqlError::UnsupportedEngine`] or [`SqlError::Connection`] when no
    ///   connection can be opened
    /// - [`SqlError::Query`] when the statement fails or a requested column
    ///   is absent from the result
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use confrow_core::Value;
    /// use confrow_sql::{ConnectionProfile, SqlStore};
    ///
    /// let store = SqlStore::new(ConnectionProfile::embedded("data/app.db"));
    /// if let Some(row) = store.fetch("users", "id", 123, &["name", "age"]).unwrap() {
    ///     assert!(row.get("name").is_some());
    /// }
    /// ```
    pub fn fetch(
        &self,
        table: &str,
        key_column: &str,
        key: impl Into<Value>,
        columns: &[&str],
    ) -> Result<Option<Row>> {
        let sql = select_statement(table, key_column, columns)?;
        let params = [key.into()];
        let mut conn = self.connector.connect()?;
        debug!(engine = %conn.engine(), %sql, "fetching row");

        let Some(row) = conn.query_first(&sql, &params).map_err(SqlError::Query)? else {
            return Ok(None);
        };
        if columns.is_empty() {
            return Ok(Some(row));
        }

        let mut projected = Row::with_capacity(columns.len());
        for column in columns {
            let value = lookup(&row, column)
                .cloned()
                .ok_or_else(|| SqlError::Query(StoreError::MissingColumn(column.to_string())))?;
            projected.push(*column, value);
        }
        Ok(Some(projected))
    }

    /// Reads one cell and converts it to `T`.
    ///
    /// Returns `Ok(None)` when no row matches or the cell is `NULL`.
    ///
    /// # Errors
    ///
    /// Everything [`fetch`](Self::fetch) returns, plus
    /// [`SqlError::TypeMismatch`] when the cell cannot be read as `T`. See
    /// [`FromValue`] for the accepted conversions.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use confrow_sql::{ConnectionProfile, SqlStore};
    ///
    /// let store = SqlStore::new(ConnectionProfile::embedded("data/app.db"));
    /// let age: Option<i64> = store.fetch_scalar("users", "id", 123, "age").unwrap();
    /// ```
    pub fn fetch_scalar<T: FromValue>(
        &self,
        table: &str,
        key_column: &str,
        key: impl Into<Value>,
        column: &str,
    ) -> Result<Option<T>> {
        let Some(row) = self.fetch(table, key_column, key, &[column])? else {
            return Ok(None);
        };
        match row.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(cell) => T::from_value(cell)
                .map(Some)
                .ok_or_else(|| SqlError::TypeMismatch {
                    column: column.to_string(),
                    requested: T::TYPE_NAME,
                    actual: cell.kind(),
                }),
        }
    }

    /// Runs an arbitrary read and returns every row.
    ///
    /// The statement is passed to the store as written, with no parameters.
    /// Only use it with trusted SQL.
    ///
    /// # Errors
    ///
    /// Connection failures as for [`fetch`](Self::fetch); any statement
    /// failure is [`SqlError::Query`].
    pub fn query_raw(&self, sql: &str) -> Result<Vec<Row>> {
        let mut conn = self.connector.connect()?;
        debug!(engine = %conn.engine(), %sql, "running raw query");
        conn.query_all(sql, &[]).map_err(SqlError::Query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_bare_label() {
        let mut row = Row::new();
        row.push("name", Value::from("Ann"));
        assert_eq!(lookup(&row, "users.name"), Some(&Value::from("Ann")));
        assert_eq!(lookup(&row, "NAME"), Some(&Value::from("Ann")));
        assert_eq!(lookup(&row, "users.\"name\""), Some(&Value::from("Ann")));
        assert_eq!(lookup(&row, "users.age"), None);
    }
}
