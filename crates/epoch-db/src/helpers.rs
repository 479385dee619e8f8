//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. Dates are written with [`format_datetime`] and read back with
//! [`parse_datetime`], which also accepts `SQLite`'s `datetime('now')` format.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use epoch_core::entities::MetricValue;

use crate::error::DatabaseError;

/// Canonical storage form: RFC 3339 UTC with milliseconds and a `Z` suffix.
///
/// Fixed width, so TEXT comparison in SQL orders chronologically.
#[must_use]
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read an INTEGER column holding 0/1 as `bool`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_bool(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Nullable variant of [`get_bool`].
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_bool(row: &libsql::Row, idx: i32) -> Result<Option<bool>, DatabaseError> {
    Ok(row.get::<Option<i64>>(idx)?.map(|v| v != 0))
}

/// Convert an optional string to a libSQL value, mapping `None` to NULL.
#[must_use]
pub fn opt_value(value: Option<&str>) -> libsql::Value {
    value.map_or(libsql::Value::Null, Into::into)
}

/// Parse the milestone metrics column.
///
/// Metrics are descriptive; a malformed value is logged and treated as absent
/// rather than failing the whole read.
#[must_use]
pub fn parse_metrics(s: Option<&str>) -> Option<BTreeMap<String, MetricValue>> {
    let s = s.filter(|s| !s.trim().is_empty())?;
    match serde_json::from_str(s) {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            tracing::warn!(%error, "ignoring malformed milestone metrics");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn storage_format_is_fixed_width_and_ordered() {
        let a = format_datetime(Utc.with_ymd_and_hms(2000, 3, 15, 0, 0, 0).unwrap());
        let b = format_datetime(Utc.with_ymd_and_hms(2007, 1, 9, 12, 0, 0).unwrap());
        assert_eq!(a, "2000-03-15T00:00:00.000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn parses_both_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 2, 9, 14, 30, 0).unwrap();
        assert_eq!(parse_datetime("2026-02-09T14:30:00.000Z").unwrap(), expected);
        assert_eq!(parse_datetime("2026-02-09 14:30:00").unwrap(), expected);
        assert!(parse_datetime("garbage").is_err());
    }

    #[test]
    fn optional_datetime_treats_empty_as_none() {
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
    }

    #[test]
    fn metrics_parse_or_fall_back_to_none() {
        let parsed = parse_metrics(Some(r#"{"employees": 21600, "hq": "Cupertino"}"#)).unwrap();
        assert_eq!(parsed["employees"], MetricValue::Number(21_600.0));
        assert_eq!(parsed["hq"], MetricValue::Text("Cupertino".into()));
        assert!(parse_metrics(Some("{broken")).is_none());
        assert!(parse_metrics(Some("")).is_none());
        assert!(parse_metrics(None).is_none());
    }
}
