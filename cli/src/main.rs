use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use confrow_core::{Mapping, Value, get_path};
use confrow_document::ConfigFile;
use confrow_sql::{ConnectionProfile, FromValue, SqlStore};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for values and rows printed to stdout.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

/// Target type for `db get`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ScalarType {
    Integer,
    Float,
    Boolean,
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "confrow")]
#[command(about = "Edit configuration documents and read or update database rows by primary key")]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read and edit YAML or JSON configuration documents.
    Config(ConfigArgs),
    /// Read and update rows through a connection profile.
    Db(DbArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    operation: ConfigOperation,
}

#[derive(Debug, Subcommand)]
enum ConfigOperation {
    /// Print the whole document or the value at a dotted path.
    Get(ConfigGetArgs),
    /// Set the value at a dotted path. Intermediate mappings must exist.
    Set(ConfigSetArgs),
    /// Remove the key at a dotted path.
    Unset(ConfigUnsetArgs),
    /// Create the document as an empty mapping if it does not exist.
    Init(ConfigInitArgs),
}

#[derive(Debug, Args)]
struct ConfigGetArgs {
    /// Document path (.yml, .yaml or .json).
    #[arg(long)]
    file: PathBuf,
    /// Dotted path such as `server.port`.
    #[arg(long)]
    path: Option<String>,
    /// Output format.
    #[arg(long, default_value = "yaml")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ConfigSetArgs {
    /// Document path (.yml, .yaml or .json).
    #[arg(long)]
    file: PathBuf,
    /// Dotted path such as `server.port`.
    #[arg(long)]
    path: String,
    /// New value, parsed as YAML (`8080`, `true`, `[a, b]`, `{k: v}`).
    #[arg(long)]
    value: String,
    /// Treat `--path` as one top-level key, dots included.
    #[arg(long)]
    literal: bool,
}

#[derive(Debug, Args)]
struct ConfigUnsetArgs {
    /// Document path (.yml, .yaml or .json).
    #[arg(long)]
    file: PathBuf,
    /// Dotted path such as `server.port`.
    #[arg(long)]
    path: String,
}

#[derive(Debug, Args)]
struct ConfigInitArgs {
    /// Document path (.yml, .yaml or .json).
    #[arg(long)]
    file: PathBuf,
}

#[derive(Debug, Args)]
struct DbArgs {
    #[command(subcommand)]
    operation: DbOperation,
}

#[derive(Debug, Subcommand)]
enum DbOperation {
    /// Print the row with the given primary key.
    Fetch(DbFetchArgs),
    /// Print one cell converted to a type.
    Get(DbGetArgs),
    /// Set columns on the row with the given primary key.
    Update(DbUpdateArgs),
    /// Run a raw write statement and print the affected row count.
    Exec(DbRawArgs),
    /// Run a raw read statement and print every row.
    Query(DbQueryArgs),
}

#[derive(Debug, Args)]
struct ProfileArgs {
    /// Configuration document holding the connection profile.
    #[arg(long)]
    profile: PathBuf,
    /// Dotted path of the profile inside the document.
    #[arg(long, default_value = "database")]
    section: String,
}

#[derive(Debug, Args)]
struct RowArgs {
    /// Table name.
    #[arg(long)]
    table: String,
    /// Primary key column.
    #[arg(long)]
    key_column: String,
    /// Primary key value, parsed as YAML (`123` binds as an integer).
    #[arg(long)]
    key: String,
}

#[derive(Debug, Args)]
struct DbFetchArgs {
    #[command(flatten)]
    profile: ProfileArgs,
    #[command(flatten)]
    row: RowArgs,
    /// Column to read; repeat for several. All columns when omitted.
    #[arg(long = "column")]
    columns: Vec<String>,
    /// Output format.
    #[arg(long, default_value = "yaml")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct DbGetArgs {
    #[command(flatten)]
    profile: ProfileArgs,
    #[command(flatten)]
    row: RowArgs,
    /// Column to read.
    #[arg(long)]
    column: String,
    /// Type to convert the cell to.
    #[arg(long = "as", default_value = "text")]
    as_type: ScalarType,
}

#[derive(Debug, Args)]
struct DbUpdateArgs {
    #[command(flatten)]
    profile: ProfileArgs,
    #[command(flatten)]
    row: RowArgs,
    /// Column assignment `COLUMN=VALUE`, value parsed as YAML; repeat for several.
    #[arg(long = "set")]
    assignments: Vec<String>,
}

#[derive(Debug, Args)]
struct DbRawArgs {
    #[command(flatten)]
    profile: ProfileArgs,
    /// Statement to run as written.
    #[arg(long)]
    sql: String,
}

#[derive(Debug, Args)]
struct DbQueryArgs {
    #[command(flatten)]
    profile: ProfileArgs,
    /// Statement to run as written.
    #[arg(long)]
    sql: String,
    /// Output format.
    #[arg(long, default_value = "yaml")]
    format: CliOutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Config(args) => run_config(args),
        Command::Db(args) => run_db(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// config command
// ---------------------------------------------------------------------------

fn run_config(args: ConfigArgs) -> Result<(), String> {
    match args.operation {
        ConfigOperation::Get(a) => run_config_get(a),
        ConfigOperation::Set(a) => run_config_set(a),
        ConfigOperation::Unset(a) => run_config_unset(a),
        ConfigOperation::Init(a) => run_config_init(a),
    }
}

fn open_document(path: PathBuf) -> Result<ConfigFile, String> {
    ConfigFile::open(&path).map_err(|e| format!("Failed to open '{}': {e}", path.display()))
}

fn run_config_get(args: ConfigGetArgs) -> Result<(), String> {
    let file = open_document(args.file)?;
    let Some(path) = args.path else {
        let root = file
            .read()
            .map_err(|e| format!("Failed to read '{}': {e}", file.path().display()))?;
        return print_formatted(&root, args.format);
    };

    let root = file
        .read_mapping()
        .map_err(|e| format!("Failed to read '{}': {e}", file.path().display()))?;
    match get_path(&root, &path).map_err(|e| e.to_string())? {
        Some(value) => print_formatted(value, args.format),
        None => Err(format!(
            "No value at '{path}' in '{}'",
            file.path().display()
        )),
    }
}

fn run_config_set(args: ConfigSetArgs) -> Result<(), String> {
    let file = open_document(args.file)?;
    let value = parse_value(&args.value);
    let previous = if args.literal {
        file.set_key(&args.path, value)
    } else {
        file.update_value(&args.path, value)
    }
    .map_err(|e| format!("Failed to set '{}': {e}", args.path))?;
    debug!(path = %args.path, ?previous, "value replaced");
    println!("Set '{}' in '{}'.", args.path, file.path().display());
    Ok(())
}

fn run_config_unset(args: ConfigUnsetArgs) -> Result<(), String> {
    let file = open_document(args.file)?;
    let removed = file
        .remove_value(&args.path)
        .map_err(|e| format!("Failed to remove '{}': {e}", args.path))?;
    if removed.is_some() {
        println!("Removed '{}' from '{}'.", args.path, file.path().display());
    } else {
        println!("No value at '{}'; nothing removed.", args.path);
    }
    Ok(())
}

fn run_config_init(args: ConfigInitArgs) -> Result<(), String> {
    let file = open_document(args.file)?;
    let created = file
        .create(&Mapping::new())
        .map_err(|e| format!("Failed to create '{}': {e}", file.path().display()))?;
    if created {
        println!("Created '{}'.", file.path().display());
    } else {
        println!("'{}' already exists; left unchanged.", file.path().display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// db command
// ---------------------------------------------------------------------------

fn run_db(args: DbArgs) -> Result<(), String> {
    match args.operation {
        DbOperation::Fetch(a) => run_db_fetch(a),
        DbOperation::Get(a) => run_db_get(a),
        DbOperation::Update(a) => run_db_update(a),
        DbOperation::Exec(a) => run_db_exec(a),
        DbOperation::Query(a) => run_db_query(a),
    }
}

fn open_store(args: &ProfileArgs) -> Result<SqlStore, String> {
    let file = open_document(args.profile.clone())?;
    let profile: ConnectionProfile = file.load_section(&args.section).map_err(|e| {
        format!(
            "Failed to load connection profile '{}' from '{}': {e}",
            args.section,
            args.profile.display()
        )
    })?;
    debug!(?profile, "loaded connection profile");
    Ok(SqlStore::new(profile))
}

fn run_db_fetch(args: DbFetchArgs) -> Result<(), String> {
    let store = open_store(&args.profile)?;
    let columns: Vec<&str> = args.columns.iter().map(String::as_str).collect();
    let row = store
        .fetch(
            &args.row.table,
            &args.row.key_column,
            parse_value(&args.row.key),
            &columns,
        )
        .map_err(|e| e.to_string())?;
    print_formatted(&row, args.format)
}

fn run_db_get(args: DbGetArgs) -> Result<(), String> {
    let store = open_store(&args.profile)?;
    let rendered = match args.as_type {
        ScalarType::Integer => fetch_rendered::<i64>(&store, &args.row, &args.column)?,
        ScalarType::Float => fetch_rendered::<f64>(&store, &args.row, &args.column)?,
        ScalarType::Boolean => fetch_rendered::<bool>(&store, &args.row, &args.column)?,
        ScalarType::Text => fetch_rendered::<String>(&store, &args.row, &args.column)?,
    };
    println!("{}", rendered.unwrap_or_else(|| "null".to_string()));
    Ok(())
}

fn fetch_rendered<T: FromValue + ToString>(
    store: &SqlStore,
    row: &RowArgs,
    column: &str,
) -> Result<Option<String>, String> {
    let value = store
        .fetch_scalar::<T>(&row.table, &row.key_column, parse_value(&row.key), column)
        .map_err(|e| e.to_string())?;
    Ok(value.map(|v| v.to_string()))
}

fn run_db_update(args: DbUpdateArgs) -> Result<(), String> {
    let store = open_store(&args.profile)?;
    let values = parse_assignments(&args.assignments)?;
    let changed = store
        .update(
            &args.row.table,
            &args.row.key_column,
            parse_value(&args.row.key),
            &values,
        )
        .map_err(|e| e.to_string())?;
    println!("Updated {changed} row(s).");
    Ok(())
}

fn run_db_exec(args: DbRawArgs) -> Result<(), String> {
    let store = open_store(&args.profile)?;
    let changed = store.execute_raw(&args.sql);
    if changed < 0 {
        return Err("Statement failed; run with --verbose or RUST_LOG=warn for details".to_string());
    }
    println!("{changed} row(s) affected.");
    Ok(())
}

fn run_db_query(args: DbQueryArgs) -> Result<(), String> {
    let store = open_store(&args.profile)?;
    let rows = store.query_raw(&args.sql).map_err(|e| e.to_string())?;
    print_formatted(&rows, args.format)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parses a command-line value as YAML, falling back to the raw string.
fn parse_value(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::from(raw))
}

/// Parses `COLUMN=VALUE` assignments in the order given.
fn parse_assignments(raw: &[String]) -> Result<Mapping, String> {
    let mut values = Mapping::with_capacity(raw.len());
    for assignment in raw {
        let (column, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("Invalid assignment '{assignment}': expected COLUMN=VALUE"))?;
        values.insert(column.trim().to_string(), parse_value(value));
    }
    Ok(values)
}

fn print_formatted<T: Serialize + ?Sized>(value: &T, format: CliOutputFormat) -> Result<(), String> {
    let raw = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
    };
    println!("{}", raw.trim_end());
    Ok(())
}
