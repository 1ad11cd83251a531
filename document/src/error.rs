//! Error types for document file operations.
//!
//! Provides a unified error type covering I/O, the two serialization formats,
//! and dotted-path failures from `confrow-core`.

use std::path::PathBuf;

use confrow_core::{PathError, ValueKind};
use thiserror::Error;

/// Errors that can occur while reading or rewriting a document file.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Dotted-path resolution failure.
    #[error(transparent)]
    PathError(#[from] PathError),

    /// The document root must be a mapping for keyed access.
    #[error("document '{}' has a {found} at its root, not a mapping", .path.display())]
    NotAMapping { path: PathBuf, found: ValueKind },

    /// The file extension does not name a supported format.
    #[error("cannot infer document format from '{}': expected .yml, .yaml or .json", .0.display())]
    UnknownFormat(PathBuf),

    /// A requested section is absent from the document.
    #[error("section '{section}' not found in '{}'", .file.display())]
    MissingSection { file: PathBuf, section: String },
}

/// Convenience alias for results with [`DocumentError`].
pub type Result<T> = std::result::Result<T, DocumentError>;
