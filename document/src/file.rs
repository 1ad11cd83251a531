//! Read, write, and update configuration documents on disk.
//!
//! [`ConfigFile`] binds a path to a [`DocumentFormat`] and offers whole-file
//! operations (read, typed load, overwrite, create-if-absent) plus dotted-path
//! edits that read the tree, apply one change with `confrow-core`, and write
//! the result back.
//!
//! # Example YAML
//!
//! ```yaml
//! database:
//!   engine: sqlite
//!   database: data/app.db
//! features:
//!   audit: false
//! ```

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use confrow_core::{Mapping, Value, get_path, remove_path, set_path};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{DocumentError, Result};
use crate::format::DocumentFormat;

/// A configuration document stored at a fixed path.
///
/// Constructing a `ConfigFile` does not touch the file system; every
/// operation opens, reads, or writes the file anew.
///
/// Path arguments are dotted in every format, JSON included, so `a.b` always
/// means key `b` inside key `a`. A top-level key that itself contains a dot
/// is reached with [`set_key`](Self::set_key) or through
/// [`read_mapping`](Self::read_mapping).
///
/// # Examples
///
/// ```no_run
/// use confrow_core::Value;
/// use confrow_document::ConfigFile;
///
/// let file = ConfigFile::open("settings.yml").unwrap();
/// file.update_value("server.port", Value::from(8080)).unwrap();
/// let root = file.read_mapping().unwrap();
/// println!("{} top-level keys", root.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    format: DocumentFormat,
}

impl ConfigFile {
    /// Binds `path`, inferring the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnknownFormat`] if the extension is not
    /// recognized.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Binds `path` with an explicit format, ignoring the extension.
    pub fn with_format(path: impl Into<PathBuf>, format: DocumentFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Returns `true` if the file currently exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Parses the whole document. An empty or whitespace-only file reads as
    /// [`Value::Null`].
    pub fn read(&self) -> Result<Value> {
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        self.format.parse(&text)
    }

    /// Parses the document and returns its root mapping. An empty document
    /// yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotAMapping`] if the root is a scalar or a
    /// sequence.
    pub fn read_mapping(&self) -> Result<Mapping> {
        match self.read()? {
            Value::Mapping(map) => Ok(map),
            Value::Null => Ok(Mapping::new()),
            other => Err(DocumentError::NotAMapping {
                path: self.path.clone(),
                found: other.kind(),
            }),
        }
    }

    /// Deserializes the whole document into `T`.
    pub fn load_as<T: DeserializeOwned>(&self) -> Result<T> {
        let text = fs::read_to_string(&self.path)?;
        self.format.parse(&text)
    }

    /// Deserializes the sub-tree at the dotted `section` path into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingSection`] if nothing is stored at
    /// `section`, or a path/serialization error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use confrow_document::ConfigFile;
    /// #[derive(serde::Deserialize)]
    /// struct Server {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// let file = ConfigFile::open("settings.yml").unwrap();
    /// let server: Server = file.load_section("services.web").unwrap();
    /// println!("{}:{}", server.host, server.port);
    /// ```
    pub fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T> {
        let root = self.read_mapping()?;
        let value = get_path(&root, section)?.ok_or_else(|| DocumentError::MissingSection {
            file: self.path.clone(),
            section: section.to_string(),
        })?;
        let json = serde_json::to_value(value)?;
        Ok(serde_json::from_value(json)?)
    }

    /// Overwrites the file with `data`, creating parent directories as
    /// needed.
    pub fn write<T: Serialize + ?Sized>(&self, data: &T) -> Result<()> {
        let text = self.format.render(data)?;
        self.ensure_parent()?;
        fs::write(&self.path, text)?;
        info!(path = %self.path.display(), "wrote document");
        Ok(())
    }

    /// Writes `data` only if the file does not exist yet.
    ///
    /// Returns `true` if the file was created, `false` if it already existed
    /// (in which case it is left untouched).
    pub fn create<T: Serialize + ?Sized>(&self, data: &T) -> Result<bool> {
        let text = self.format.render(data)?;
        self.ensure_parent()?;
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        file.write_all(text.as_bytes())?;
        info!(path = %self.path.display(), "created document");
        Ok(true)
    }

    /// Sets the value at a dotted path and writes the document back.
    ///
    /// Intermediate mappings must already exist. Returns the replaced value.
    /// If the path cannot be resolved, the file is not rewritten.
    pub fn update_value(&self, path: &str, value: Value) -> Result<Option<Value>> {
        let mut root = self.read_mapping()?;
        let previous = set_path(&mut root, path, value)?;
        debug!(path = %self.path.display(), key = path, "updated document value");
        self.write(&root)?;
        Ok(previous)
    }

    /// Sets the top-level key `key` verbatim, without splitting on dots, and
    /// writes the document back. Returns the replaced value.
    pub fn set_key(&self, key: &str, value: Value) -> Result<Option<Value>> {
        let mut root = self.read_mapping()?;
        let previous = root.insert(key.to_string(), value);
        debug!(path = %self.path.display(), key, "set document key");
        self.write(&root)?;
        Ok(previous)
    }

    /// Removes the value at a dotted path. The file is only rewritten when
    /// something was actually removed.
    pub fn remove_value(&self, path: &str) -> Result<Option<Value>> {
        let mut root = self.read_mapping()?;
        let removed = remove_path(&mut root, path)?;
        if removed.is_some() {
            debug!(path = %self.path.display(), key = path, "removed document value");
            self.write(&root)?;
        }
        Ok(removed)
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
