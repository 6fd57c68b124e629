//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. Timestamps are written with [`format_datetime`] so that the
//! stored text sorts chronologically; reads also accept `SQLite`'s
//! `datetime('now')` format.

use chrono::{DateTime, SecondsFormat, Utc};
use swipe_core::classification::ClassificationCode;

use crate::error::DatabaseError;

/// Fixed-width RFC 3339 (`2026-02-09T14:30:00.000000Z`). Lexical order of
/// these strings equals chronological order.
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
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
/// Works with all swipe-core enums that use `#[serde(rename_all = "snake_case")]`,
/// including their serde aliases.
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
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
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

/// Read a nullable classification code column.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the stored code is malformed.
pub fn get_opt_code(
    row: &libsql::Row,
    idx: i32,
) -> Result<Option<ClassificationCode>, DatabaseError> {
    get_opt_string(row, idx)?
        .map(|s| {
            ClassificationCode::parse(&s)
                .map_err(|e| DatabaseError::InvalidState(format!("stored code: {e}")))
        })
        .transpose()
}

/// Read a non-negative INTEGER column as `u64`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for negative values.
pub fn get_u64(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u64::try_from(raw)
        .map_err(|_| DatabaseError::InvalidState(format!("negative counter {raw} in column {idx}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use swipe_core::enums::Role;

    #[test]
    fn formatted_datetimes_sort_chronologically() {
        let a = Utc.with_ymd_and_hms(2026, 2, 9, 14, 30, 0).unwrap();
        let b = a + chrono::Duration::microseconds(1);
        let c = a + chrono::Duration::seconds(1);
        let (fa, fb, fc) = (format_datetime(&a), format_datetime(&b), format_datetime(&c));
        assert_eq!(fa, "2026-02-09T14:30:00.000000Z");
        assert!(fa < fb && fb < fc);
    }

    #[test]
    fn datetime_roundtrip() {
        let now = Utc::now();
        let parsed = parse_datetime(&format_datetime(&now)).unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn sqlite_default_format_accepted() {
        let dt = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(format_datetime(&dt), "2026-02-09T14:30:00.000000Z");
    }

    #[test]
    fn enum_parsing_accepts_aliases() {
        let role: Role = parse_enum("professionnel").unwrap();
        assert_eq!(role, Role::Professional);
        assert!(parse_enum::<Role>("admin").is_err());
    }

    #[test]
    fn optional_datetime_empty_is_none() {
        assert!(parse_optional_datetime(None).unwrap().is_none());
        assert!(parse_optional_datetime(Some("")).unwrap().is_none());
    }
}
