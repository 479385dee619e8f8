use chrono::{DateTime, Datelike, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Milestone, Snapshot};

/// A company whose website history is tracked.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub founded_date: Option<DateTime<Utc>>,
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<CompanyCounts>,
}

impl Company {
    /// Whole calendar years between founding and `at`. `None` without a founding date.
    #[must_use]
    pub fn age_years_at(&self, at: DateTime<Utc>) -> Option<i32> {
        self.founded_date.map(|founded| at.year() - founded.year())
    }
}

/// Related record counts shown in company listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompanyCounts {
    pub snapshots: u32,
    pub milestones: u32,
}

/// A company with its full snapshot and milestone history, both date-ascending.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub snapshots: Vec<Snapshot>,
    pub milestones: Vec<Milestone>,
}
