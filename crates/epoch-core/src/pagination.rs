//! Page arithmetic for the paginated snapshot listing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Snapshot;

/// Page metadata returned next to a page of results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// `total_pages` is `ceil(total / limit)`; a zero limit yields zero pages.
    #[must_use]
    pub const fn new(page: u32, limit: u32, total: u32) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// One page of snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SnapshotPage {
    pub snapshots: Vec<Snapshot>,
    pub pagination: Pagination,
}
