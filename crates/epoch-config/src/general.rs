//! General application configuration.

use epoch_core::query::QueryDefaults;
use serde::{Deserialize, Serialize};

/// Snapshots returned by the timeline endpoint when no limit is given.
const fn default_timeline_limit() -> u32 {
    50
}

const fn default_page_size() -> u32 {
    20
}

const fn default_max_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    #[serde(default = "default_timeline_limit")]
    pub timeline_limit: u32,

    /// Default page size of the paginated snapshot listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timeline_limit: default_timeline_limit(),
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl GeneralConfig {
    #[must_use]
    pub const fn query_defaults(&self) -> QueryDefaults {
        QueryDefaults {
            timeline_limit: self.timeline_limit,
            page_size: self.page_size,
            max_page_size: self.max_page_size,
        }
    }
}
