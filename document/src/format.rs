//! Supported on-disk document formats.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DocumentError, Result};

/// Serialization format of a document file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML, written in block style.
    Yaml,
    /// JSON, written pretty-printed.
    Json,
}

impl DocumentFormat {
    /// Infers the format from the file extension (`.yml`, `.yaml`, `.json`,
    /// case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnknownFormat`] for any other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use confrow_document::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path("config.YML").unwrap(), DocumentFormat::Yaml);
    /// assert_eq!(DocumentFormat::from_path("data/state.json").unwrap(), DocumentFormat::Json);
    /// assert!(DocumentFormat::from_path("notes.txt").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(DocumentError::UnknownFormat(path.to_path_buf())),
        }
    }

    pub(crate) fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T> {
        match self {
            Self::Yaml => Ok(serde_yaml::from_str(text)?),
            Self::Json => Ok(serde_json::from_str(text)?),
        }
    }

    pub(crate) fn render<T: Serialize + ?Sized>(self, data: &T) -> Result<String> {
        match self {
            Self::Yaml => Ok(serde_yaml::to_string(data)?),
            Self::Json => {
                let mut text = serde_json::to_string_pretty(data)?;
                text.push('\n');
                Ok(text)
            }
        }
    }
}
