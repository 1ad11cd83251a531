//! File-backed YAML and JSON configuration documents.
//!
//! This crate handles the file side of configuration management: reading a
//! document into a [`confrow_core::Value`] tree, loading it (or one section
//! of it) as a typed struct, writing trees back, and applying single
//! dotted-path edits to a file.
//!
//! # Quick start
//!
//! ```no_run
//! use confrow_core::Value;
//! use confrow_document::ConfigFile;
//!
//! let file = ConfigFile::open("config/app.yml").unwrap();
//!
//! // Seed the file on first run
//! let mut defaults = confrow_core::Mapping::new();
//! defaults.insert("debug".into(), Value::from(false));
//! file.create(&defaults).unwrap();
//!
//! // Flip a single key
//! file.update_value("debug", Value::from(true)).unwrap();
//! ```
//!
//! # Formats
//!
//! The format is inferred from the extension (`.yml`/`.yaml` → YAML,
//! `.json` → JSON) or chosen explicitly with [`ConfigFile::with_format`].
//! YAML is written in block style; JSON is pretty-printed.

mod error;
mod file;
mod format;

pub use error::{DocumentError, Result};
pub use file::ConfigFile;
pub use format::DocumentFormat;
