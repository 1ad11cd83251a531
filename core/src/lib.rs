//! Nested value tree and dotted-path mutation for configuration documents.
//!
//! This crate defines the in-memory shape every other confrow crate works
//! with:
//!
//! - [`Value`]: a closed set of scalar, sequence, and mapping variants. The
//!   same type holds parsed YAML/JSON documents and database row cells.
//! - [`Mapping`]: a string-keyed, insertion-ordered mapping node.
//! - [`DottedPath`]: a validated `a.b.c` path.
//!
//! Path operations ([`set_path`], [`get_path`], [`remove_path`]) descend
//! through existing mappings only and fail with a [`PathError`] before
//! writing anything.
//!
//! Parsing and serialization are left to serde formats; `Value` implements
//! both traits.
//!
//! # Example
//!
//! ```
//! use confrow_core::*;
//!
//! let mut config: Mapping = serde_json::from_str(r#"{"server": {"port": 80}}"#).unwrap();
//! set_path(&mut config, "server.port", Value::from(8080)).unwrap();
//! assert_eq!(get_path(&config, "server.port").unwrap(), Some(&Value::Integer(8080)));
//! ```

mod error;
mod path;
mod value;

pub use error::{PathError, Result};
pub use path::{DottedPath, get_path, remove_path, set_path};
pub use value::{Mapping, Value, ValueKind};
