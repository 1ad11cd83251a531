use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn confrow(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_confrow"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run confrow")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

fn write_config(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("app.yml");
    fs::write(&path, "server:\n  host: localhost\n  port: 8080\n").unwrap();
    path
}

/// Seeds a SQLite database and a JSON profile document pointing at it.
fn write_database(dir: &tempfile::TempDir) -> PathBuf {
    let db = dir.path().join("app.db");
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);
         INSERT INTO users VALUES (123, 'Ann', 30);",
    )
    .unwrap();

    let profile = serde_json::json!({
        "database": { "engine": "sqlite", "database": db.to_string_lossy() }
    });
    let path = dir.path().join("profile.json");
    fs::write(&path, serde_json::to_string_pretty(&profile).unwrap()).unwrap();
    path
}

// ---------------------------------------------------------------------------
// config command
// ---------------------------------------------------------------------------

#[test]
fn config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_config(&dir);

    let out = confrow(&["config", "set", "--file", arg(&file), "--path", "server.port", "--value", "9090"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let out = confrow(&["config", "get", "--file", arg(&file), "--path", "server.port"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "9090\n");

    let text = fs::read_to_string(&file).unwrap();
    assert_eq!(text, "server:\n  host: localhost\n  port: 9090\n");
}

#[test]
fn config_set_through_scalar_fails_and_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_config(&dir);
    let before = fs::read_to_string(&file).unwrap();

    let out = confrow(&["config", "set", "--file", arg(&file), "--path", "server.port.value", "--value", "1"]);
    assert!(!out.status.success());
    assert!(stderr(&out).starts_with("error: "));
    assert_eq!(fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn config_set_literal_key_with_dots() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("hosts.json");
    fs::write(&file, "{}").unwrap();

    let out = confrow(&[
        "config", "set", "--file", arg(&file), "--path", "db.example.com", "--value", "10.0.0.5",
        "--literal",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(parsed["db.example.com"], "10.0.0.5");
}

#[test]
fn config_get_json_and_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_config(&dir);

    let out = confrow(&["config", "get", "--file", arg(&file), "--path", "server", "--format", "json"]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(parsed["port"], 8080);

    let out = confrow(&["config", "get", "--file", arg(&file), "--path", "server.tls"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("server.tls"));
}

#[test]
fn config_unset_and_init() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_config(&dir);

    let out = confrow(&["config", "unset", "--file", arg(&file), "--path", "server.host"]);
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(&file).unwrap(), "server:\n  port: 8080\n");

    let fresh = dir.path().join("new/settings.json");
    let out = confrow(&["config", "init", "--file", arg(&fresh)]);
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(&fresh).unwrap(), "{}\n");

    let out = confrow(&["config", "init", "--file", arg(&file)]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("already exists"));
}

// ---------------------------------------------------------------------------
// db command
// ---------------------------------------------------------------------------

#[test]
fn db_fetch_prints_row() {
    let dir = tempfile::tempdir().unwrap();
    let profile = write_database(&dir);

    let out = confrow(&[
        "db", "fetch", "--profile", arg(&profile), "--table", "users", "--key-column", "id",
        "--key", "123", "--column", "name", "--column", "age", "--format", "json",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "{\n  \"name\": \"Ann\",\n  \"age\": 30\n}\n");

    let out = confrow(&[
        "db", "fetch", "--profile", arg(&profile), "--table", "users", "--key-column", "id",
        "--key", "999",
    ]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "null\n");
}

#[test]
fn db_fetch_renders_blob_as_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let profile = write_database(&dir);
    let db = dir.path().join("app.db");
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(
        "CREATE TABLE avatars (id INTEGER PRIMARY KEY, image BLOB);
         INSERT INTO avatars VALUES (1, x'00ff');",
    )
    .unwrap();
    drop(conn);

    let out = confrow(&[
        "db", "fetch", "--profile", arg(&profile), "--table", "avatars", "--key-column", "id",
        "--key", "1", "--column", "image",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "image:\n- 0\n- 255\n");
}

#[test]
fn db_update_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let profile = write_database(&dir);

    let out = confrow(&[
        "db", "update", "--profile", arg(&profile), "--table", "users", "--key-column", "id",
        "--key", "123", "--set", "age=31",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "Updated 1 row(s).\n");

    let out = confrow(&[
        "db", "get", "--profile", arg(&profile), "--table", "users", "--key-column", "id",
        "--key", "123", "--column", "age", "--as", "integer",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "31\n");

    let out = confrow(&[
        "db", "get", "--profile", arg(&profile), "--table", "users", "--key-column", "id",
        "--key", "123", "--column", "name", "--as", "integer",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("cannot be read as integer"));
}

#[test]
fn db_update_without_assignments_fails() {
    let dir = tempfile::tempdir().unwrap();
    let profile = write_database(&dir);

    let out = confrow(&[
        "db", "update", "--profile", arg(&profile), "--table", "users", "--key-column", "id",
        "--key", "123",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("at least one column"));
}

#[test]
fn db_exec_and_query() {
    let dir = tempfile::tempdir().unwrap();
    let profile = write_database(&dir);

    let out = confrow(&["db", "exec", "--profile", arg(&profile), "--sql", "DELETE FROM users"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "1 row(s) affected.\n");

    let out = confrow(&["db", "exec", "--profile", arg(&profile), "--sql", "DELETE FROM nowhere"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("raw statement failed"));

    let out = confrow(&["db", "query", "--profile", arg(&profile), "--sql", "SELECT COUNT(*) AS n FROM users"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "- n: 0\n");
}

#[test]
fn db_unknown_engine_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let profile = dir.path().join("profile.yml");
    fs::write(&profile, "database:\n  engine: postgres\n  database: app\n").unwrap();

    let out = confrow(&["db", "query", "--profile", arg(&profile), "--sql", "SELECT 1"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("unsupported database engine 'postgres'"));
}
