//! Integration tests for the confrow-document crate.

use std::fs;

use confrow_core::{Mapping, PathError, Value};
use confrow_document::{ConfigFile, DocumentError, DocumentFormat};
use serde::Deserialize;

const SAMPLE_YAML: &str = r#"database:
  engine: sqlite
  database: data/app.db
  port: 3306
server:
  host: localhost
  port: 8080
"#;

#[derive(Debug, Deserialize, PartialEq)]
struct Server {
    host: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct AppConfig {
    server: Server,
}

fn write_sample(dir: &tempfile::TempDir) -> ConfigFile {
    let path = dir.path().join("app.yml");
    fs::write(&path, SAMPLE_YAML).unwrap();
    ConfigFile::open(path).unwrap()
}

#[test]
fn update_value_rewrites_only_the_target_key() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sample(&dir);

    let previous = file.update_value("server.port", Value::from(9090)).unwrap();
    assert_eq!(previous, Some(Value::Integer(8080)));

    let text = fs::read_to_string(file.path()).unwrap();
    assert_eq!(
        text,
        "database:\n  engine: sqlite\n  database: data/app.db\n  port: 3306\nserver:\n  host: localhost\n  port: 9090\n"
    );
}

#[test]
fn update_value_conflict_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sample(&dir);

    let err = file
        .update_value("server.port.number", Value::from(1))
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentError::PathError(PathError::PathConflict { .. })
    ));
    assert_eq!(fs::read_to_string(file.path()).unwrap(), SAMPLE_YAML);
}

#[test]
fn update_value_missing_intermediate_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sample(&dir);

    let err = file
        .update_value("cache.redis.url", Value::from("redis://"))
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentError::PathError(PathError::MissingSegment { .. })
    ));
    assert_eq!(fs::read_to_string(file.path()).unwrap(), SAMPLE_YAML);
}

#[test]
fn remove_value_deletes_key() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sample(&dir);

    let removed = file.remove_value("database.port").unwrap();
    assert_eq!(removed, Some(Value::Integer(3306)));
    let root = file.read_mapping().unwrap();
    assert!(!root["database"].as_mapping().unwrap().contains_key("port"));

    assert_eq!(file.remove_value("database.port").unwrap(), None);
}

#[test]
fn load_as_and_load_section() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sample(&dir);

    let config: AppConfig = file.load_as().unwrap();
    assert_eq!(config.server.port, 8080);

    let server: Server = file.load_section("server").unwrap();
    assert_eq!(
        server,
        Server {
            host: "localhost".into(),
            port: 8080
        }
    );

    let err = file.load_section::<Server>("services.web").unwrap_err();
    assert!(matches!(err, DocumentError::MissingSection { .. }));
}

#[test]
fn create_only_writes_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/dir/state.json");
    let file = ConfigFile::open(&path).unwrap();

    let mut initial = Mapping::new();
    initial.insert("version".into(), Value::from(1));
    assert!(file.create(&initial).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"version\": 1\n}\n");

    let mut other = Mapping::new();
    other.insert("version".into(), Value::from(2));
    assert!(!file.create(&other).unwrap());
    assert_eq!(
        file.read().unwrap(),
        Value::Mapping(initial),
        "existing file must not be overwritten"
    );
}

#[test]
fn json_document_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let file = ConfigFile::with_format(dir.path().join("players.data"), DocumentFormat::Json);

    let root: Value = serde_json::from_str(r#"{"players": {"steve": {"score": 10}}}"#).unwrap();
    file.write(&root).unwrap();
    file.update_value("players.steve.score", Value::from(11))
        .unwrap();

    let reread = file.read_mapping().unwrap();
    let steve = reread["players"].as_mapping().unwrap()["steve"]
        .as_mapping()
        .unwrap();
    assert_eq!(steve["score"], Value::Integer(11));
}

#[test]
fn update_on_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = ConfigFile::open(dir.path().join("absent.yml")).unwrap();
    let err = file.update_value("a", Value::Null).unwrap_err();
    assert!(matches!(err, DocumentError::IoError(_)));
    assert!(!file.exists());
}
