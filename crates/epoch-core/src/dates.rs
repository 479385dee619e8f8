//! Date parsing for query parameters and request bodies.

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::CoreError;

/// Parse a date given either as `YYYY-MM-DD` (UTC midnight) or RFC 3339.
///
/// # Errors
///
/// Returns `CoreError::InvalidParameter` naming `field` when neither format matches.
pub fn parse_date_param(field: &str, raw: &str) -> Result<DateTime<Utc>, CoreError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CoreError::invalid_parameter(field, format!("'{raw}' is not a date (YYYY-MM-DD or RFC 3339)"))
        })
}

/// Parse an optional date parameter. Empty strings count as absent.
///
/// # Errors
///
/// Returns `CoreError::InvalidParameter` if a non-empty value does not parse.
pub fn parse_optional_date_param(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, CoreError> {
    match raw {
        Some(s) if !s.trim().is_empty() => parse_date_param(field, s).map(Some),
        _ => Ok(None),
    }
}

/// Serde adapters accepting the same formats as [`parse_date_param`] in
/// request bodies.
pub mod flexible {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// # Errors
    ///
    /// Fails when the value is not a string in a supported date format.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date_param("date", &raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer};

        /// # Errors
        ///
        /// Fails when a present value is not a supported date string.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw = Option::<String>::deserialize(d)?;
            super::super::parse_optional_date_param("date", raw.as_deref())
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Midnight UTC on the given calendar day. Returns `None` for impossible dates.
#[must_use]
pub fn utc_date(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}
