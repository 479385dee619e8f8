use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Commentary, Company, DesignAnalysis, Source};

/// One archived capture of a company's website at a point in time.
///
/// Attachments are lists; only the first commentary and the first design
/// analysis are treated as effective.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub company_id: String,
    pub snapshot_date: DateTime<Utc>,
    pub wayback_url: Option<String>,
    pub screenshot_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_major_change: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub commentary: Vec<Commentary>,
    #[serde(default)]
    pub design_analysis: Vec<DesignAnalysis>,
}

impl Snapshot {
    #[must_use]
    pub fn effective_commentary(&self) -> Option<&Commentary> {
        self.commentary.first()
    }

    #[must_use]
    pub fn effective_design_analysis(&self) -> Option<&DesignAnalysis> {
        self.design_analysis.first()
    }
}
