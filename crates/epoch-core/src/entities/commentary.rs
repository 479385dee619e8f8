use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::json_list::parse_string_list;

/// Editorial notes attached to a snapshot.
///
/// `tags` holds a serialized JSON array; use [`Commentary::tag_list`] to read it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Commentary {
    pub id: String,
    pub snapshot_id: String,
    pub commentary_text: Option<String>,
    pub design_notes: Option<String>,
    pub business_context: Option<String>,
    pub tags: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Commentary {
    /// Parsed tags. Malformed JSON yields an empty list.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        parse_string_list(&self.tags)
    }
}
