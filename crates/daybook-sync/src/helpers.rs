//! Row decoding helpers.
//!
//! Stored timestamps come in two shapes: `SQLite`'s `datetime('now')` default
//! and `to_rfc3339()` written by this crate. JSON columns hold serde documents.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::error::SyncError;

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `SyncError::Query` if the string matches neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SyncError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| SyncError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Decode a JSON TEXT column.
///
/// # Errors
///
/// Returns `SyncError::InvalidState` naming `column` if the document does not
/// match `T`.
pub fn parse_json_column<T: DeserializeOwned>(column: &str, s: &str) -> Result<T, SyncError> {
    serde_json::from_str(s)
        .map_err(|e| SyncError::InvalidState(format!("Invalid JSON in column '{column}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_datetime_formats() {
        let rfc = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let sqlite = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(rfc, sqlite);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn json_column_error_names_column() {
        let err = parse_json_column::<Vec<String>>("tasks", "{not json").unwrap_err();
        assert!(err.to_string().contains("tasks"));
    }
}
