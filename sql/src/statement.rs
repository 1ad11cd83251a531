//! SQL text for primary-key reads and updates.
//!
//! Table and column names are spliced into the statement text, so they are
//! checked with [`validate_identifier`] first. Values are never spliced; every
//! value position is a `?` placeholder bound by the driver.

use crate::error::{Result, SqlError};

/// Checks that a table or column name is safe to splice into SQL.
///
/// A valid identifier is made of dot-separated parts (`users`, `app.users`,
/// `users.name`). Each part is a non-empty run of letters, digits and
/// underscores in any script, optionally wrapped in double quotes or
/// backticks so reserved words can be named (`"order"`, `` `order` ``).
/// Whitespace, quotes inside a part, `;`, `'` and `-` are never accepted.
///
/// # Errors
///
/// Returns [`SqlError::InvalidIdentifier`] otherwise.
///
/// # Examples
///
/// ```
/// use confrow_sql::validate_identifier;
///
/// assert!(validate_identifier("app.users").is_ok());
/// assert!(validate_identifier("\"order\"").is_ok());
/// assert!(validate_identifier("näme").is_ok());
/// assert!(validate_identifier("users; DROP TABLE users").is_err());
/// ```
pub fn validate_identifier(name: &str) -> Result<()> {
    if !name.is_empty() && name.split('.').all(valid_part) {
        Ok(())
    } else {
        Err(SqlError::InvalidIdentifier(name.to_string()))
    }
}

fn valid_part(part: &str) -> bool {
    let inner = unquote(part);
    !inner.is_empty() && inner.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Strips one pair of surrounding double quotes or backticks.
fn unquote(part: &str) -> &str {
    ['"', '`']
        .iter()
        .find_map(|q| part.strip_prefix(*q)?.strip_suffix(*q))
        .unwrap_or(part)
}

/// The label a store reports for a requested column: the last part of a
/// qualified name, without quotes.
pub(crate) fn bare_name(column: &str) -> &str {
    unquote(column.rsplit('.').next().unwrap_or(column))
}

/// `SELECT <columns> FROM <table> WHERE <key> = ?`, with `*` for an empty
/// column list.
pub(crate) fn select_statement(table: &str, key_column: &str, columns: &[&str]) -> Result<String> {
    validate_identifier(table)?;
    validate_identifier(key_column)?;
    for column in columns {
        validate_identifier(column)?;
    }
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };
    Ok(format!(
        "SELECT {projection} FROM {table} WHERE {key_column} = ?"
    ))
}

/// `UPDATE <table> SET c1 = ?, c2 = ? WHERE <key> = ?`. Assignments follow
/// the order of `columns`.
pub(crate) fn update_statement(
    table: &str,
    key_column: &str,
    columns: &[&str],
) -> Result<String> {
    validate_identifier(table)?;
    validate_identifier(key_column)?;
    let mut assignments = Vec::with_capacity(columns.len());
    for column in columns {
        validate_identifier(column)?;
        assignments.push(format!("{column} = ?"));
    }
    Ok(format!(
        "UPDATE {table} SET {} WHERE {key_column} = ?",
        assignments.join(", ")
    ))
}
