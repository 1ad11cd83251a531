//! Error types for row access.
//!
//! [`StoreError`] describes a failure inside a store driver. [`SqlError`] is
//! what callers see: it says which operation failed (connect, read, write)
//! and wraps the driver failure as its source.

use confrow_core::ValueKind;
use thiserror::Error;

use crate::profile::EngineKind;

/// Failure reported by a store driver.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite driver failure.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// MySQL driver failure.
    #[cfg(feature = "mysql")]
    #[error("mysql: {0}")]
    MySql(#[from] sqlx::Error),

    /// The private runtime backing the networked driver could not start.
    #[error("driver runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// Sequences and mappings cannot be bound as statement parameters.
    #[error("cannot bind a {0} as a statement parameter")]
    UnsupportedParameter(ValueKind),

    /// A requested column is not part of the result set.
    #[error("column '{0}' is not in the result set")]
    MissingColumn(String),

    /// Support for the engine was not compiled into this build.
    #[error("{0} engine support is not compiled in")]
    Unavailable(EngineKind),
}

/// Errors returned by [`SqlStore`](crate::SqlStore) operations and the
/// connection provider.
#[derive(Debug, Error)]
pub enum SqlError {
    /// The profile names an engine this crate does not know.
    #[error("unsupported database engine '{0}'")]
    UnsupportedEngine(String),

    /// Opening a connection failed. Never retried.
    #[error("failed to connect to {engine} database: {source}")]
    Connection {
        engine: EngineKind,
        #[source]
        source: StoreError,
    },

    /// Preparing or running a read failed.
    #[error("query failed: {0}")]
    Query(#[source] StoreError),

    /// A cell was read but cannot be converted to the requested type.
    #[error("column '{column}' holds a {actual} value, which cannot be read as {requested}")]
    TypeMismatch {
        column: String,
        requested: &'static str,
        actual: ValueKind,
    },

    /// An update was requested with no column values.
    #[error("update requires at least one column value")]
    EmptyUpdate,

    /// Preparing or running a write failed.
    #[error("update failed: {0}")]
    Update(#[source] StoreError),

    /// A table or column name contains characters other than ASCII
    /// alphanumerics, underscores, and qualifying dots.
    #[error("invalid identifier '{0}': use letters, digits, underscores and dots only")]
    InvalidIdentifier(String),
}

/// Convenience alias for results with [`SqlError`].
pub type Result<T> = std::result::Result<T, SqlError>;
