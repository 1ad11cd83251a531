//! Networked store driver over MySQL.
//!
//! sqlx is async; the driver owns a private current-thread tokio runtime and
//! blocks on each call so the [`StoreConnection`] surface stays synchronous.
//!
//! Cells are decoded by the column's reported type. Integer, floating and
//! boolean columns become numbers and booleans, binary columns become
//! [`Value::Binary`], and everything else is read as raw bytes and kept as
//! text when it is valid UTF-8. Temporal columns arrive in the binary
//! protocol's packed form and therefore surface as [`Value::Binary`]; select
//! them through `CAST(.. AS CHAR)` to read text.

use std::str::FromStr;

use confrow_core::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, ConnectOptions, Row as _, TypeInfo, ValueRef};
use tokio::runtime::{Builder, Runtime};

use crate::connection::StoreConnection;
use crate::error::StoreError;
use crate::profile::EngineKind;
use crate::row::Row;

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

pub(crate) struct MySqlStore {
    // dropped before the runtime
    conn: MySqlConnection,
    runtime: Runtime,
}

impl MySqlStore {
    /// Connects to `url` (`mysql://host:port/database`) with the given
    /// credentials.
    pub(crate) fn connect(url: &str, username: &str, password: &str) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let options = MySqlConnectOptions::from_str(url)?
            .username(username)
            .password(password);
        let conn = runtime.block_on(options.connect())?;
        Ok(Self { conn, runtime })
    }
}

fn bind<'q>(query: MySqlQuery<'q>, value: &Value) -> Result<MySqlQuery<'q>, StoreError> {
    Ok(match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Integer(n) => query.bind(*n),
        Value::Float(f) => query.bind(*f),
        Value::String(s) => query.bind(s.clone()),
        Value::Binary(bytes) => query.bind(bytes.clone()),
        other => return Err(StoreError::UnsupportedParameter(other.kind())),
    })
}

fn prepare<'q>(sql: &'q str, params: &[Value]) -> Result<MySqlQuery<'q>, StoreError> {
    params.iter().try_fold(sqlx::query::<MySql>(sql), bind)
}

fn cell(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, StoreError> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get_unchecked::<bool, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            Value::Integer(row.try_get_unchecked::<i64, _>(index)?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => {
            let n = row.try_get_unchecked::<u64, _>(index)?;
            match i64::try_from(n) {
                Ok(n) => Value::Integer(n),
                Err(_) => Value::Float(n as f64),
            }
        }
        "FLOAT" => Value::Float(f64::from(row.try_get_unchecked::<f32, _>(index)?)),
        "DOUBLE" => Value::Float(row.try_get_unchecked::<f64, _>(index)?),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
        | "GEOMETRY" => Value::Binary(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            match String::from_utf8(bytes) {
                Ok(text) => Value::String(text),
                Err(err) => Value::Binary(err.into_bytes()),
            }
        }
    };
    Ok(value)
}

fn read_row(row: &MySqlRow) -> Result<Row, StoreError> {
    let mut out = Row::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = cell(row, index, column.type_info().name())?;
        out.push(column.name(), value);
    }
    Ok(out)
}

impl StoreConnection for MySqlStore {
    fn engine(&self) -> EngineKind {
        EngineKind::Networked
    }

    fn query_first(&mut self, sql: &str, params: &[Value]) -> Result<Option<Row>, StoreError> {
        let query = prepare(sql, params)?;
        let row = self.runtime.block_on(query.fetch_optional(&mut self.conn))?;
        row.as_ref().map(read_row).transpose()
    }

    fn query_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        let query = prepare(sql, params)?;
        let rows = self.runtime.block_on(query.fetch_all(&mut self.conn))?;
        rows.iter().map(read_row).collect()
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        let query = prepare(sql, params)?;
        let done = self.runtime.block_on(query.execute(&mut self.conn))?;
        Ok(done.rows_affected())
    }
}
