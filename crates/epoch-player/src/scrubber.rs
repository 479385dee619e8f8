//! Pointer-driven scrubbing along the timeline track.
//!
//! Positions are measured in the track's own coordinates: `0.0` is the left
//! edge and `width` the right edge. Pointers outside the track clamp to the
//! nearest end.

use epoch_core::entities::{Milestone, Snapshot};
use epoch_core::timeline::marker_percent;

use crate::store::{IndexUpdate, TimelineStore};

/// Snapshot index under `x` on a track of `width`, or `None` with no snapshots.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn index_for_position(x: f64, width: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    if !width.is_finite() || width <= 0.0 || x.is_nan() {
        return Some(0);
    }
    let ratio = (x / width).clamp(0.0, 1.0);
    let index = (ratio * (count - 1) as f64).round() as usize;
    Some(index.min(count - 1))
}

/// Thumb offset for `index`, in percent of the track width.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn thumb_position_percent(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    index.min(count - 1) as f64 / (count - 1) as f64 * 100.0
}

/// Track positions of snapshots flagged as major changes.
#[must_use]
pub fn major_change_markers(snapshots: &[Snapshot]) -> Vec<f64> {
    snapshots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_major_change)
        .map(|(i, _)| thumb_position_percent(i, snapshots.len()))
        .collect()
}

/// Milestones placed by date between the first and last snapshot.
#[must_use]
pub fn milestone_markers<'a>(
    snapshots: &[Snapshot],
    milestones: &'a [Milestone],
) -> Vec<(f64, &'a Milestone)> {
    let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) else {
        return Vec::new();
    };
    milestones
        .iter()
        .map(|m| {
            (
                marker_percent(m.milestone_date, first.snapshot_date, last.snapshot_date),
                m,
            )
        })
        .collect()
}

/// Screenshot URLs worth fetching ahead of time around `index`: two on each side.
#[must_use]
pub fn preload_targets(snapshots: &[Snapshot], index: usize) -> Vec<String> {
    [
        index.checked_sub(2),
        index.checked_sub(1),
        index.checked_add(1),
        index.checked_add(2),
    ]
    .into_iter()
    .flatten()
    .filter_map(|i| snapshots.get(i))
    .filter_map(|s| s.screenshot_url.clone())
    .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct Scrubber {
    width: f64,
    dragging: bool,
}

impl Scrubber {
    #[must_use]
    pub const fn new(width: f64) -> Self {
        Self {
            width,
            dragging: false,
        }
    }

    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Jump to `x` and start dragging. Returns the applied index, or `None`
    /// with no snapshots (the drag does not start either).
    pub fn pointer_down(&mut self, store: &mut TimelineStore, x: f64) -> Option<usize> {
        let index = self.apply(store, x)?;
        self.dragging = true;
        Some(index)
    }

    /// Follow the pointer while dragging.
    pub fn pointer_move(&mut self, store: &mut TimelineStore, x: f64) -> Option<usize> {
        if !self.dragging {
            return None;
        }
        self.apply(store, x)
    }

    pub const fn pointer_up(&mut self) {
        self.dragging = false;
    }

    fn apply(&self, store: &mut TimelineStore, x: f64) -> Option<usize> {
        let index = index_for_position(x, self.width, store.snapshots().len())?;
        Some(store.set_current_index(IndexUpdate::To(index)))
    }
}
