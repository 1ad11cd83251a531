//! The store-driver seam.
//!
//! [`Connector`] hands out connections and [`StoreConnection`] runs bound
//! statements on one. The production connector is
//! [`ConnectionProfile`](crate::ConnectionProfile); tests substitute their
//! own implementations to observe what the accessor and updater issue.

use confrow_core::Value;

use crate::error::{Result, StoreError};
use crate::profile::EngineKind;
use crate::row::Row;

/// Produces a fresh connection for every call.
pub trait Connector {
    /// Opens a new connection. The caller owns it and drops it when the
    /// operation ends.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::UnsupportedEngine`](crate::SqlError::UnsupportedEngine)
    /// for an unknown engine name and
    /// [`SqlError::Connection`](crate::SqlError::Connection) when the driver
    /// cannot reach the store.
    fn connect(&self) -> Result<Box<dyn StoreConnection>>;
}

impl<C: Connector + ?Sized> Connector for &C {
    fn connect(&self) -> Result<Box<dyn StoreConnection>> {
        (**self).connect()
    }
}

/// An open connection to a store.
///
/// `sql` uses `?` placeholders; `params` are bound in order. Rows carry the
/// store's column labels in store order.
pub trait StoreConnection {
    /// The engine behind this connection, for logging.
    fn engine(&self) -> EngineKind;

    /// Runs a read and returns the first row, if any.
    fn query_first(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> std::result::Result<Option<Row>, StoreError>;

    /// Runs a read and returns every row.
    fn query_all(&mut self, sql: &str, params: &[Value])
    -> std::result::Result<Vec<Row>, StoreError>;

    /// Runs a write and returns the number of affected rows.
    fn execute(&mut self, sql: &str, params: &[Value]) -> std::result::Result<u64, StoreError>;
}
