//! Primary-key updates and raw writes.

use confrow_core::{Mapping, Value};
use tracing::{debug, warn};

use crate::connection::Connector;
use crate::error::{Result, SqlError};
use crate::statement::update_statement;
use crate::store::SqlStore;

impl<C: Connector> SqlStore<C> {
    /// Sets the given columns on the row whose `key_column` equals `key`.
    ///
    /// Assignments follow the mapping's iteration order; the column list and
    /// the bound values come from the same pass over `values`, and the key is
    /// bound last. Returns the number of affected rows. Zero is not an error.
    ///
    /// # Errors
    ///
    /// - [`SqlError::EmptyUpdate`] when `values` is empty; nothing is
    ///   connected or sent
    /// - [`SqlError::InvalidIdentifier`] for a malformed table or column name
    /// - [`SqlError::UnsupportedEngine`] or [`SqlError::Connection`] when no
    ///   connection can be opened
    /// - [`SqlError::Update`] when the statement fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use confrow_core::{Mapping, Value};
    /// use confrow_sql::{ConnectionProfile, SqlStore};
    ///
    /// let store = SqlStore::new(ConnectionProfile::embedded("data/app.db"));
    ///
    /// let mut values = Mapping::new();
    /// values.insert("age".into(), Value::from(31));
    /// let changed = store.update("users", "id", 123, &values).unwrap();
    /// assert!(changed <= 1);
    /// ```
    pub fn update(
        &self,
        table: &str,
        key_column: &str,
        key: impl Into<Value>,
        values: &Mapping,
    ) -> Result<u64> {
        if values.is_empty() {
            return Err(SqlError::EmptyUpdate);
        }

        let (columns, mut params): (Vec<&str>, Vec<Value>) = values
            .iter()
            .map(|(column, value)| (column.as_str(), value.clone()))
            .unzip();
        params.push(key.into());
        let sql = update_statement(table, key_column, &columns)?;

        let mut conn = self.connector.connect()?;
        debug!(engine = %conn.engine(), %sql, params = params.len(), "updating row");
        conn.execute(&sql, &params).map_err(SqlError::Update)
    }

    /// Runs an arbitrary write and returns the affected row count.
    ///
    /// Unlike every other operation this one does not surface errors: any
    /// failure, including failing to connect, is logged as a warning and
    /// reported as `-1`. Only use it with trusted SQL.
    pub fn execute_raw(&self, sql: &str) -> i64 {
        let result = self.connector.connect().and_then(|mut conn| {
            debug!(engine = %conn.engine(), %sql, "running raw statement");
            conn.execute(sql, &[]).map_err(SqlError::Update)
        });
        match result {
            Ok(changed) => i64::try_from(changed).unwrap_or(i64::MAX),
            Err(err) => {
                warn!(error = %err, %sql, "raw statement failed");
                -1
            }
        }
    }
}
