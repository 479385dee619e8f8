use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SourceType;

/// A publication that gives context to a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub snapshot_id: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub title: String,
    pub url: String,
    pub publisher: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub excerpt: Option<String>,
    pub created_at: DateTime<Utc>,
}
