//! Primary-key row reads and updates over SQLite and MySQL.
//!
//! A [`ConnectionProfile`] says which engine to use and how to reach it. A
//! [`SqlStore`] built on it reads and writes single rows by primary key,
//! always through bound `?` parameters, opening a fresh connection for every
//! call.
//!
//! # Architecture
//!
//! - **`profile`**: [`ConnectionProfile`] and [`EngineKind`]; the profile is
//!   the production [`Connector`]
//! - **`connection`**: the [`Connector`] / [`StoreConnection`] driver seam
//! - **`sqlite`**, **`mysql`**: the embedded and networked drivers
//! - **`statement`**: SQL text and identifier checks
//! - **`query`**: [`SqlStore::fetch`], [`SqlStore::fetch_scalar`],
//!   [`SqlStore::query_raw`]
//! - **`update`**: [`SqlStore::update`], [`SqlStore::execute_raw`]
//! - **`convert`**: the [`FromValue`] conversion table
//!
//! The networked engine is behind the `mysql` feature, enabled by default.
//!
//! # Quick start
//!
//! ```
//! use confrow_core::{Mapping, Value};
//! use confrow_sql::{ConnectionProfile, SqlStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("app.db");
//! let conn = rusqlite::Connection::open(&path).unwrap();
//! conn.execute_batch(
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);
//!      INSERT INTO users VALUES (123, 'Ann', 30);",
//! )
//! .unwrap();
//!
//! let store = SqlStore::new(ConnectionProfile::embedded(path.to_string_lossy()));
//!
//! let mut values = Mapping::new();
//! values.insert("age".into(), Value::from(31));
//! assert_eq!(store.update("users", "id", 123, &values).unwrap(), 1);
//!
//! let age: Option<i64> = store.fetch_scalar("users", "id", 123, "age").unwrap();
//! assert_eq!(age, Some(31));
//! ```

mod connection;
mod convert;
mod error;
#[cfg(feature = "mysql")]
mod mysql;
mod profile;
mod query;
mod row;
mod sqlite;
mod statement;
mod store;
mod update;

pub use connection::{Connector, StoreConnection};
pub use convert::FromValue;
pub use error::{Result, SqlError, StoreError};
pub use profile::{ConnectionProfile, EngineKind};
pub use row::Row;
pub use statement::validate_identifier;
pub use store::SqlStore;
