//! Row parsing helpers.
//!
//! Columns are read by index. Datetimes are written as RFC 3339 but
//! `datetime('now')` defaults produce `SQLite`'s own format, so both parse.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `StoreError::Query` if the string is neither RFC 3339 nor
/// `YYYY-MM-DD HH:MM:SS`.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `StoreError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, StoreError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde enum (`rename_all = "snake_case"` or
/// explicit renames).
///
/// # Errors
///
/// Returns `StoreError::Query` if the string matches no variant.
pub fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| StoreError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. SQL NULL and empty string both give `None`.
///
/// # Errors
///
/// Returns `StoreError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, StoreError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Decode an optional JSON TEXT column.
///
/// # Errors
///
/// Returns `StoreError::Json` for malformed JSON.
pub fn parse_optional_json<T: DeserializeOwned>(s: Option<&str>) -> Result<Option<T>, StoreError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(serde_json::from_str(s)?)),
        _ => Ok(None),
    }
}

/// Encode an optional value as a JSON TEXT column, `NULL` when absent.
///
/// # Errors
///
/// Returns `StoreError::Json` if serialization fails.
pub fn optional_json<T: Serialize>(value: Option<&T>) -> Result<libsql::Value, StoreError> {
    match value {
        Some(value) => Ok(serde_json::to_string(value)?.into()),
        None => Ok(libsql::Value::Null),
    }
}

/// `Option<DateTime>` as a TEXT column value.
#[must_use]
pub fn optional_datetime(value: Option<DateTime<Utc>>) -> libsql::Value {
    value.map_or(libsql::Value::Null, |dt| dt.to_rfc3339().into())
}

/// `Option<f64>` as a REAL column value.
#[must_use]
pub fn optional_real(value: Option<f64>) -> libsql::Value {
    value.map_or(libsql::Value::Null, libsql::Value::Real)
}
