//! Error types for dotted-path operations on a value tree.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised while resolving a dotted path against a [`Mapping`](crate::Mapping).
///
/// Every variant carries the full path as the caller supplied it so the
/// message can be shown without extra context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path is empty or contains an empty segment (`"a..b"`, `".a"`, `"a."`).
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The rejected path text.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An intermediate segment exists but does not hold a mapping.
    #[error("segment '{segment}' of path '{path}' holds a {found}, not a mapping")]
    PathConflict {
        /// The offending segment.
        segment: String,
        /// The full path.
        path: String,
        /// Kind of value found at the segment.
        found: ValueKind,
    },

    /// An intermediate segment does not exist. Mappings are never created
    /// implicitly.
    #[error("segment '{segment}' of path '{path}' does not exist")]
    MissingSegment {
        /// The absent segment.
        segment: String,
        /// The full path.
        path: String,
    },
}

/// Convenience alias for results with [`PathError`].
pub type Result<T> = std::result::Result<T, PathError>;
