//! Query parameters for the timeline and paginated snapshot endpoints.
//!
//! Both endpoints take their parameters as strings (query string or CLI flags).
//! Parsing validates them once so the store only sees typed values.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::dates::parse_optional_date_param;
use crate::errors::CoreError;

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    #[must_use]
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    /// Parse `startDate` / `endDate` parameters.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidParameter` for an unparseable date.
    pub fn from_params(start: Option<&str>, end: Option<&str>) -> Result<Self, CoreError> {
        Ok(Self {
            start: parse_optional_date_param("startDate", start)?,
            end: parse_optional_date_param("endDate", end)?,
        })
    }
}

/// Defaults and caps applied while parsing query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefaults {
    pub timeline_limit: u32,
    pub page_size: u32,
    pub max_page_size: u32,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            timeline_limit: 50,
            page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Parameters of the timeline fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineQuery {
    pub range: DateRange,
    /// Maximum number of snapshots, taken after the ascending date sort.
    pub limit: u32,
}

impl Default for TimelineQuery {
    fn default() -> Self {
        Self {
            range: DateRange::default(),
            limit: QueryDefaults::default().timeline_limit,
        }
    }
}

impl TimelineQuery {
    /// Parse from a `startDate` / `endDate` / `limit` parameter map.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidParameter` for unparseable values.
    pub fn from_params(
        params: &HashMap<String, String>,
        defaults: &QueryDefaults,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            range: DateRange::from_params(param(params, "startDate"), param(params, "endDate"))?,
            limit: parse_positive(param(params, "limit"), "limit", defaults.timeline_limit)?,
        })
    }
}

/// Parameters of the paginated snapshot listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotPageQuery {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    pub major_changes_only: bool,
    pub range: DateRange,
}

impl Default for SnapshotPageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: QueryDefaults::default().page_size,
            major_changes_only: false,
            range: DateRange::default(),
        }
    }
}

impl SnapshotPageQuery {
    /// Rows to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.limit as u64
    }

    /// Parse from a `page` / `limit` / `majorChangesOnly` / `startDate` /
    /// `endDate` parameter map. `limit` is capped at `max_page_size`; only the
    /// literal `true` enables the major-change filter.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidParameter` for unparseable values.
    pub fn from_params(
        params: &HashMap<String, String>,
        defaults: &QueryDefaults,
    ) -> Result<Self, CoreError> {
        let limit = parse_positive(param(params, "limit"), "limit", defaults.page_size)?;
        Ok(Self {
            page: parse_positive(param(params, "page"), "page", 1)?,
            limit: limit.min(defaults.max_page_size.max(1)),
            major_changes_only: param(params, "majorChangesOnly") == Some("true"),
            range: DateRange::from_params(param(params, "startDate"), param(params, "endDate"))?,
        })
    }
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
}

fn parse_positive(raw: Option<&str>, name: &str, default: u32) -> Result<u32, CoreError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(CoreError::invalid_parameter(name, "must be at least 1")),
        Ok(value) => Ok(value),
        Err(_) => Err(CoreError::invalid_parameter(
            name,
            format!("'{raw}' is not a positive integer"),
        )),
    }
}
