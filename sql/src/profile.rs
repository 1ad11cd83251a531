//! Connection profiles and the connection provider.
//!
//! A [`ConnectionProfile`] names a store engine and the parameters needed to
//! reach it. It is usually deserialized from a section of a configuration
//! document:
//!
//! ```yaml
//! database:
//!   engine: mysql
//!   host: db.internal
//!   port: 3306
//!   username: app
//!   password: secret
//!   database: inventory
//! ```
//!
//! or, for the embedded engine, just a file path:
//!
//! ```yaml
//! database:
//!   engine: sqlite
//!   database: data/app.db
//! ```
//!
//! The profile implements [`Connector`]; every [`Connector::connect`] call
//! opens a fresh connection. Nothing is pooled or reused.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::connection::{Connector, StoreConnection};
use crate::error::{Result, SqlError, StoreError};
use crate::sqlite::SqliteStore;

/// Category of backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// A server reached over the network (MySQL).
    Networked,
    /// A file-backed database opened in process (SQLite).
    Embedded,
}

impl EngineKind {
    /// Parses an engine name, ignoring ASCII case.
    ///
    /// `mysql` and `networked` select [`EngineKind::Networked`]; `sqlite` and
    /// `embedded` select [`EngineKind::Embedded`].
    ///
    /// # Examples
    ///
    /// ```
    /// use confrow_sql::EngineKind;
    ///
    /// assert_eq!(EngineKind::parse("MySQL"), Some(EngineKind::Networked));
    /// assert_eq!(EngineKind::parse("sqlite"), Some(EngineKind::Embedded));
    /// assert_eq!(EngineKind::parse("oracle"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mysql" | "networked" => Some(Self::Networked),
            "sqlite" | "embedded" => Some(Self::Embedded),
            _ => None,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Networked => f.write_str("networked"),
            Self::Embedded => f.write_str("embedded"),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

/// Parameters for opening a store connection.
///
/// Fields are private and only readable once built, so a profile cannot
/// change after construction. For the embedded engine only
/// [`database`](Self::database) (the file path) is used.
///
/// # Examples
///
/// ```
/// use confrow_sql::{ConnectionProfile, EngineKind};
///
/// let profile = ConnectionProfile::networked("db.internal", 3306, "app", "secret", "inventory");
/// assert_eq!(profile.engine_kind().unwrap(), EngineKind::Networked);
/// assert_eq!(profile.connection_string().unwrap(), "mysql://db.internal:3306/inventory");
///
/// // Debug output never shows the password
/// assert!(!format!("{profile:?}").contains("secret"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(alias = "type", alias = "db_type")]
    engine: String,
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    database: String,
}

impl ConnectionProfile {
    /// Starts a profile for the named engine with default host, port and
    /// empty credentials. The engine name is only checked at connect time.
    pub fn new(engine: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            host: default_host(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            database: database.into(),
        }
    }

    /// Profile for a MySQL server.
    pub fn networked(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self::new("mysql", database)
            .with_host(host, port)
            .with_credentials(username, password)
    }

    /// Profile for a SQLite file.
    pub fn embedded(path: impl Into<String>) -> Self {
        Self::new("sqlite", path)
    }

    /// Replaces host and port.
    pub fn with_host(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Replaces user name and password.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// The engine name as given.
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Server host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Login user name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login password. Never included in `Debug` output.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Database name (networked) or file path (embedded).
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Resolves the engine name.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::UnsupportedEngine`] naming the given engine if it
    /// is not recognized.
    pub fn engine_kind(&self) -> Result<EngineKind> {
        EngineKind::parse(&self.engine)
            .ok_or_else(|| SqlError::UnsupportedEngine(self.engine.clone()))
    }

    /// Builds the driver connection string.
    ///
    /// The networked form embeds host, port and database name; credentials
    /// are supplied separately when connecting. The embedded form is the file
    /// path alone.
    pub fn connection_string(&self) -> Result<String> {
        Ok(match self.engine_kind()? {
            EngineKind::Networked => {
                format!("mysql://{}:{}/{}", self.host, self.port, self.database)
            }
            EngineKind::Embedded => self.database.clone(),
        })
    }
}

impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"******")
            .field("database", &self.database)
            .finish()
    }
}

impl Connector for ConnectionProfile {
    fn connect(&self) -> Result<Box<dyn StoreConnection>> {
        let engine = self.engine_kind()?;
        let target = self.connection_string()?;
        let wrap = |source: StoreError| SqlError::Connection { engine, source };
        debug!(%engine, host = %self.host, database = %self.database, "opening connection");

        match engine {
            EngineKind::Embedded => {
                let store = SqliteStore::open(&target).map_err(wrap)?;
                Ok(Box::new(store))
            }
            EngineKind::Networked => connect_networked(&target, self).map_err(wrap),
        }
    }
}

#[cfg(feature = "mysql")]
fn connect_networked(
    url: &str,
    profile: &ConnectionProfile,
) -> std::result::Result<Box<dyn StoreConnection>, StoreError> {
    let store = crate::mysql::MySqlStore::connect(url, &profile.username, &profile.password)?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "mysql"))]
fn connect_networked(
    _url: &str,
    _profile: &ConnectionProfile,
) -> std::result::Result<Box<dyn StoreConnection>, StoreError> {
    Err(StoreError::Unavailable(EngineKind::Networked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_kind_parse() {
        assert_eq!(EngineKind::parse("NETWORKED"), Some(EngineKind::Networked));
        assert_eq!(EngineKind::parse("Embedded"), Some(EngineKind::Embedded));
        assert_eq!(EngineKind::parse(""), None);
    }

    #[test]
    fn test_embedded_connection_string_is_path() {
        let profile = ConnectionProfile::embedded("data/app.db").with_host("ignored", 1);
        assert_eq!(profile.connection_string().unwrap(), "data/app.db");
    }

    #[test]
    fn test_unsupported_engine_names_the_kind() {
        let profile = ConnectionProfile::new("postgres", "app");
        let err = profile.connection_string().unwrap_err();
        assert!(matches!(&err, SqlError::UnsupportedEngine(kind) if kind == "postgres"));
        assert_eq!(err.to_string(), "unsupported database engine 'postgres'");
        assert!(matches!(
            profile.connect(),
            Err(SqlError::UnsupportedEngine(_))
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let yaml = "engine: sqlite\ndatabase: /tmp/x.db\n";
        let profile: ConnectionProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.engine(), "sqlite");
        assert_eq!(profile.host(), "localhost");
        assert_eq!(profile.port(), 3306);
        assert_eq!(profile.username(), "");
        assert_eq!(profile.database(), "/tmp/x.db");
    }

    #[test]
    fn test_deserialize_accepts_db_type_alias() {
        let yaml = r#"
db_type: mysql
host: 10.0.0.5
port: 3307
username: app
password: hunter2
database: shop
"#;
        let profile: ConnectionProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.engine_kind().unwrap(), EngineKind::Networked);
        assert_eq!(profile.password(), "hunter2");
        assert_eq!(
            profile.connection_string().unwrap(),
            "mysql://10.0.0.5:3307/shop"
        );
    }

    #[test]
    fn test_debug_masks_password() {
        let profile = ConnectionProfile::networked("h", 1, "u", "topsecret", "d");
        let debug = format!("{profile:?}");
        assert!(debug.contains("******"));
        assert!(!debug.contains("topsecret"));
    }

    #[test]
    fn test_embedded_connect_failure_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("app.db");
        let profile = ConnectionProfile::embedded(path.to_string_lossy().into_owned());
        let err = profile.connect().err().expect("parent directory does not exist");
        assert!(matches!(
            err,
            SqlError::Connection {
                engine: EngineKind::Embedded,
                source: StoreError::Sqlite(_)
            }
        ));
    }
}
