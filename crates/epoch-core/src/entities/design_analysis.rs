use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::json_list::parse_string_list;

/// Visual characteristics recorded for a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DesignAnalysis {
    pub id: String,
    pub snapshot_id: String,
    pub primary_colors: String,
    pub fonts: String,
    pub layout_type: Option<String>,
    pub has_mobile_version: Option<bool>,
    pub page_weight_kb: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl DesignAnalysis {
    #[must_use]
    pub fn primary_color_list(&self) -> Vec<String> {
        parse_string_list(&self.primary_colors)
    }

    #[must_use]
    pub fn font_list(&self) -> Vec<String> {
        parse_string_list(&self.fonts)
    }
}
