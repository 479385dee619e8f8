//! Timeline state shared by the playback controller, scrubber and viewer.
//!
//! A single owned [`TimelineStore`] holds everything the viewer renders.
//! Components receive it by `&mut` and change it only through the named
//! operations below.

use epoch_core::entities::{Company, Milestone, Snapshot};
use epoch_core::timeline::TimelineData;

/// Issued when a company is selected; presented back with the fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub company_id: String,
}

/// Outcome of [`TimelineStore::resolve_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchResolution {
    Applied,
    /// A newer selection was made after the ticket was issued.
    Superseded,
}

/// New value for the current index.
pub enum IndexUpdate {
    To(usize),
    /// Computed from the latest index at the time of the update.
    With(Box<dyn FnOnce(usize) -> usize + Send>),
}

impl IndexUpdate {
    pub fn with(f: impl FnOnce(usize) -> usize + Send + 'static) -> Self {
        Self::With(Box::new(f))
    }
}

impl std::fmt::Debug for IndexUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::To(i) => f.debug_tuple("To").field(i).finish(),
            Self::With(_) => f.write_str("With(..)"),
        }
    }
}

#[derive(Debug)]
pub struct TimelineStore {
    companies: Vec<Company>,
    selected: Option<Company>,
    data: Option<TimelineData>,
    current_index: usize,
    playing: bool,
    speed: f64,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self {
            companies: Vec::new(),
            selected: None,
            data: None,
            current_index: 0,
            playing: false,
            speed: 1.0,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl TimelineStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Companies and selection ────────────────────────────────────────

    pub fn set_companies(&mut self, companies: Vec<Company>) {
        self.companies = companies;
    }

    #[must_use]
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    #[must_use]
    pub const fn selected_company(&self) -> Option<&Company> {
        self.selected.as_ref()
    }

    /// Select `company` and start loading its timeline.
    ///
    /// Clears the previous timeline in the same step, so nothing from the
    /// old company is visible under the new selection.
    pub fn begin_selection(&mut self, company: Company) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            company_id: company.id.clone(),
        };
        self.selected = Some(company);
        self.data = None;
        self.current_index = 0;
        self.loading = true;
        ticket
    }

    /// Apply a finished fetch if `ticket` still matches the current selection.
    pub fn resolve_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<TimelineData, String>,
    ) -> FetchResolution {
        let current = ticket.generation == self.generation
            && self
                .selected
                .as_ref()
                .is_some_and(|c| c.id == ticket.company_id);
        if !current {
            tracing::debug!(
                company_id = %ticket.company_id,
                generation = ticket.generation,
                latest = self.generation,
                "discarding superseded fetch"
            );
            return FetchResolution::Superseded;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.current_index = 0;
                self.error = None;
            }
            Err(message) => {
                tracing::warn!(company_id = %ticket.company_id, %message, "timeline fetch failed");
                self.error = Some(message);
            }
        }
        FetchResolution::Applied
    }

    // ── Timeline and index ─────────────────────────────────────────────

    #[must_use]
    pub const fn timeline_data(&self) -> Option<&TimelineData> {
        self.data.as_ref()
    }

    /// Snapshots of the loaded timeline, empty when nothing is loaded.
    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        self.data.as_ref().map_or(&[], |d| d.snapshots.as_slice())
    }

    #[must_use]
    pub fn milestones(&self) -> &[Milestone] {
        self.data.as_ref().map_or(&[], |d| d.milestones.as_slice())
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Apply `update`, clamped into `0..len`. Returns the index now in effect.
    pub fn set_current_index(&mut self, update: IndexUpdate) -> usize {
        let requested = match update {
            IndexUpdate::To(index) => index,
            IndexUpdate::With(f) => f(self.current_index),
        };
        let last = self.snapshots().len().saturating_sub(1);
        self.current_index = requested.min(last);
        self.current_index
    }

    #[must_use]
    pub fn snapshot_at(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots().get(index)
    }

    #[must_use]
    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.snapshot_at(self.current_index)
    }

    /// Most recent milestone on or before the current snapshot's date.
    #[must_use]
    pub fn current_milestone(&self) -> Option<&Milestone> {
        self.data.as_ref()?.milestone_for_snapshot(self.current_index)
    }

    /// `"3 of 12"`, or `None` with no snapshots.
    #[must_use]
    pub fn progress_label(&self) -> Option<String> {
        let total = self.snapshots().len();
        (total > 0).then(|| format!("{} of {total}", self.current_index + 1))
    }

    // ── Flags ──────────────────────────────────────────────────────────

    pub const fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    pub(crate) const fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub(crate) const fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Utc};
    use epoch_core::dates::utc_date;
    use epoch_core::entities::{Company, Milestone, Snapshot};
    use epoch_core::enums::MilestoneType;
    use epoch_core::timeline::TimelineData;

    pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        utc_date(y, m, d).unwrap()
    }

    pub fn company(id: &str) -> Company {
        Company {
            id: id.to_string(),
            name: id.to_uppercase(),
            domain: format!("{id}.example"),
            founded_date: None,
            industry: None,
            created_at: day(2020, 1, 1),
            updated_at: day(2020, 1, 1),
            counts: None,
        }
    }

    pub fn snapshot(company_id: &str, n: usize, date: DateTime<Utc>) -> Snapshot {
        Snapshot {
            id: format!("{company_id}-snp-{n}"),
            company_id: company_id.to_string(),
            snapshot_date: date,
            wayback_url: None,
            screenshot_url: Some(format!("https://shots.example/{company_id}/{n}.png")),
            thumbnail_url: None,
            is_major_change: n % 2 == 0,
            created_at: date,
            company: None,
            sources: Vec::new(),
            commentary: Vec::new(),
            design_analysis: Vec::new(),
        }
    }

    pub fn milestone(company_id: &str, title: &str, date: DateTime<Utc>) -> Milestone {
        Milestone {
            id: format!("{company_id}-{title}"),
            company_id: company_id.to_string(),
            milestone_date: date,
            milestone_type: MilestoneType::Product,
            title: title.to_string(),
            description: None,
            metrics: None,
            created_at: date,
        }
    }

    /// `count` yearly snapshots starting in 2000.
    pub fn timeline(company_id: &str, count: usize) -> TimelineData {
        let snapshots = (0..count)
            .map(|n| snapshot(company_id, n, day(2000 + i32::try_from(n).unwrap(), 1, 1)))
            .collect();
        TimelineData::assemble(snapshots, Vec::new())
    }
}
