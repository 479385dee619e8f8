//! Chronological feed assembly and point-in-time lookups.
//!
//! The backend returns snapshots and milestones already sorted ascending by
//! date. [`TimelineData::assemble`] merges them into one tagged feed and
//! [`milestone_as_of`] answers "which milestone was most recent at this date".

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Milestone, Snapshot};
use crate::enums::EntryKind;

/// One entry of the merged feed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TimelineEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub date: DateTime<Utc>,
    pub data: TimelineItem,
}

/// Payload of a feed entry. Untagged; the entry's `type` says which it is.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum TimelineItem {
    Snapshot(Snapshot),
    Milestone(Milestone),
}

impl TimelineEntry {
    #[must_use]
    pub fn snapshot(snapshot: Snapshot) -> Self {
        Self {
            kind: EntryKind::Snapshot,
            date: snapshot.snapshot_date,
            data: TimelineItem::Snapshot(snapshot),
        }
    }

    #[must_use]
    pub fn milestone(milestone: Milestone) -> Self {
        Self {
            kind: EntryKind::Milestone,
            date: milestone.milestone_date,
            data: TimelineItem::Milestone(milestone),
        }
    }
}

/// The fetched aggregate for one company.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineData {
    pub timeline: Vec<TimelineEntry>,
    pub snapshots: Vec<Snapshot>,
    pub milestones: Vec<Milestone>,
    pub total_snapshots: u32,
    pub total_milestones: u32,
}

impl TimelineData {
    /// Build the aggregate from date-ascending snapshot and milestone lists.
    ///
    /// The feed is a stable sort by date: on equal dates snapshots come before
    /// milestones, and each kind keeps its input order.
    #[must_use]
    pub fn assemble(snapshots: Vec<Snapshot>, milestones: Vec<Milestone>) -> Self {
        let mut timeline: Vec<TimelineEntry> = snapshots
            .iter()
            .cloned()
            .map(TimelineEntry::snapshot)
            .chain(milestones.iter().cloned().map(TimelineEntry::milestone))
            .collect();
        timeline.sort_by_key(|entry| entry.date);

        Self {
            timeline,
            total_snapshots: u32::try_from(snapshots.len()).unwrap_or(u32::MAX),
            total_milestones: u32::try_from(milestones.len()).unwrap_or(u32::MAX),
            snapshots,
            milestones,
        }
    }

    /// Milestone in effect at the snapshot at `index`, if any.
    #[must_use]
    pub fn milestone_for_snapshot(&self, index: usize) -> Option<&Milestone> {
        let snapshot = self.snapshots.get(index)?;
        milestone_as_of(&self.milestones, snapshot.snapshot_date)
    }
}

/// The milestone with the latest date at or before `at`.
///
/// When several milestones share that latest date, the first one in input
/// order wins. Returns `None` when every milestone is later than `at`.
#[must_use]
pub fn milestone_as_of(milestones: &[Milestone], at: DateTime<Utc>) -> Option<&Milestone> {
    let mut best: Option<&Milestone> = None;
    for milestone in milestones {
        if milestone.milestone_date > at {
            continue;
        }
        match best {
            Some(current) if milestone.milestone_date <= current.milestone_date => {}
            _ => best = Some(milestone),
        }
    }
    best
}

/// Horizontal position of `date` on a track spanning `start..=end`, in percent.
///
/// Clamped to `0..=100`; a zero-length span places everything at 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn marker_percent(date: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let span = (end - start).num_milliseconds();
    if span <= 0 {
        return 0.0;
    }
    let offset = (date - start).num_milliseconds();
    (offset as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
}
