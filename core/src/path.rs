//! Dotted-path resolution and mutation.
//!
//! A path such as `database.primary.host` addresses a leaf inside nested
//! mappings. Every segment before the last must already exist and hold a
//! mapping; the mutator descends into what is there and never creates
//! intermediate mappings. Descent finishes before anything is written, so a
//! failed call leaves the tree untouched.
//!
//! # Examples
//!
//! ```
//! use confrow_core::{Mapping, PathError, Value, get_path, set_path};
//!
//! let mut root: Mapping = serde_yaml::from_str("database:\n  host: old\n").unwrap();
//!
//! set_path(&mut root, "database.host", Value::from("db.internal")).unwrap();
//! assert_eq!(
//!     get_path(&root, "database.host").unwrap(),
//!     Some(&Value::from("db.internal"))
//! );
//!
//! let err = set_path(&mut root, "database.host.port", Value::from(5432)).unwrap_err();
//! assert!(matches!(err, PathError::PathConflict { .. }));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{PathError, Result};
use crate::value::{Mapping, Value};

/// A parsed, validated dotted path with at least one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedPath {
    raw: String,
    segments: Vec<String>,
}

impl DottedPath {
    /// Parses `raw`, splitting on `.`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidPath`] for an empty string or when any
    /// segment is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use confrow_core::DottedPath;
    ///
    /// let path = DottedPath::parse("a.b.c").unwrap();
    /// assert_eq!(path.segments(), ["a", "b", "c"]);
    /// assert_eq!(path.leaf(), "c");
    ///
    /// assert!(DottedPath::parse("").is_err());
    /// assert!(DottedPath::parse("a..c").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(PathError::InvalidPath {
                path: raw.to_string(),
                reason: "path is empty",
            });
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::InvalidPath {
                path: raw.to_string(),
                reason: "path contains an empty segment",
            });
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, naming the leaf.
    pub fn leaf(&self) -> &str {
        // parse() guarantees at least one segment
        &self.segments[self.segments.len() - 1]
    }

    /// Segments leading to the leaf's parent mapping.
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The path as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for DottedPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Walks `path.parents()` from `root`, returning the mapping that holds the leaf.
fn parent_mut<'a>(root: &'a mut Mapping, path: &DottedPath) -> Result<&'a mut Mapping> {
    let mut current = root;
    for segment in path.parents() {
        current = match current.get_mut(segment.as_str()) {
            Some(Value::Mapping(next)) => next,
            Some(other) => {
                return Err(PathError::PathConflict {
                    segment: segment.clone(),
                    path: path.to_string(),
                    found: other.kind(),
                });
            }
            None => {
                return Err(PathError::MissingSegment {
                    segment: segment.clone(),
                    path: path.to_string(),
                });
            }
        };
    }
    Ok(current)
}

/// Sets the leaf addressed by `path` to `value`, returning the value it
/// replaced.
///
/// A single-segment path sets directly on `root`.
///
/// # Errors
///
/// - [`PathError::InvalidPath`] if `path` is malformed.
/// - [`PathError::PathConflict`] if an intermediate segment holds a non-mapping.
/// - [`PathError::MissingSegment`] if an intermediate segment is absent.
///
/// In every error case `root` is left unchanged.
pub fn set_path(root: &mut Mapping, path: &str, value: Value) -> Result<Option<Value>> {
    let path = DottedPath::parse(path)?;
    let parent = parent_mut(root, &path)?;
    Ok(parent.insert(path.leaf().to_string(), value))
}

/// Looks up the value addressed by `path`.
///
/// Returns `Ok(None)` when the leaf or any intermediate mapping is absent.
///
/// # Errors
///
/// [`PathError::InvalidPath`] for a malformed path and
/// [`PathError::PathConflict`] when an intermediate segment holds a
/// non-mapping value.
pub fn get_path<'a>(root: &'a Mapping, path: &str) -> Result<Option<&'a Value>> {
    let path = DottedPath::parse(path)?;
    let mut current = root;
    for segment in path.parents() {
        current = match current.get(segment.as_str()) {
            Some(Value::Mapping(next)) => next,
            Some(other) => {
                return Err(PathError::PathConflict {
                    segment: segment.clone(),
                    path: path.to_string(),
                    found: other.kind(),
                });
            }
            None => return Ok(None),
        };
    }
    Ok(current.get(path.leaf()))
}

/// Removes the leaf addressed by `path`, returning it if it existed.
///
/// Sibling order is preserved. An absent intermediate mapping is not an
/// error: there is nothing to remove.
///
/// # Errors
///
/// [`PathError::InvalidPath`] and [`PathError::PathConflict`] as for
/// [`set_path`].
pub fn remove_path(root: &mut Mapping, path: &str) -> Result<Option<Value>> {
    let path = DottedPath::parse(path)?;
    match parent_mut(root, &path) {
        Ok(parent) => Ok(parent.shift_remove(path.leaf())),
        Err(PathError::MissingSegment { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}
