//! Auto-advance through the snapshot list.
//!
//! The controller owns a single scheduled tick. Time is always passed in, so
//! the same code runs against the tokio clock in the viewer loop and against
//! a paused clock in tests.
//!
//! # Invariants
//!
//! 1. At most one tick is scheduled at a time.
//! 2. After [`PlaybackController::stop`] returns, no tick mutates the store.
//! 3. A tick at the last snapshot stops playback without moving the index.

use std::time::Duration;

use epoch_config::PlaybackConfig;
use thiserror::Error;
use tokio::time::Instant;

use crate::store::{IndexUpdate, TimelineStore};

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    #[error("invalid playback speed {0}: must be a positive number")]
    InvalidSpeed(f64),

    #[error("unsupported playback speed {speed}: choose one of {offered}")]
    UnsupportedSpeed { speed: f64, offered: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// The pending tick. `task_id` changes every time playback (re)starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    pub task_id: u64,
    pub due: Instant,
    pub period: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Moved to the given index.
    Advanced(usize),
    /// Was already at the last snapshot; playback stopped.
    Finished,
    /// The tick belonged to a cancelled schedule.
    Ignored,
}

#[derive(Debug)]
pub struct PlaybackController {
    base_period: Duration,
    speeds: Vec<f64>,
    state: PlaybackState,
    task: Option<ScheduledTick>,
    next_task_id: u64,
}

impl PlaybackController {
    /// A controller offering exactly `speeds`.
    #[must_use]
    pub const fn new(base_period: Duration, speeds: Vec<f64>) -> Self {
        Self {
            base_period,
            speeds,
            state: PlaybackState::Stopped,
            task: None,
            next_task_id: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(Duration::from_millis(config.base_period_ms), config.speeds.clone())
    }

    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Speed multipliers the controller accepts.
    #[must_use]
    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    #[must_use]
    pub const fn scheduled(&self) -> Option<ScheduledTick> {
        self.task
    }

    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.task.map(|t| t.due)
    }

    /// Tick period at `speed`.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::InvalidSpeed` for non-finite or non-positive
    /// speeds and for periods too long to schedule, and
    /// `PlaybackError::UnsupportedSpeed` for speeds not on offer.
    pub fn period_for(&self, speed: f64) -> Result<Duration, PlaybackError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlaybackError::InvalidSpeed(speed));
        }
        if !self.speeds.iter().any(|offered| (offered - speed).abs() < f64::EPSILON) {
            let offered = self
                .speeds
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(PlaybackError::UnsupportedSpeed { speed, offered });
        }
        let period = Duration::try_from_secs_f64(self.base_period.as_secs_f64() / speed)
            .map_err(|_| PlaybackError::InvalidSpeed(speed))?;
        if Instant::now().checked_add(period).is_none() {
            return Err(PlaybackError::InvalidSpeed(speed));
        }
        Ok(period)
    }

    /// Start playing. Returns `false` (and stays stopped) when there is
    /// nothing to play.
    pub fn play(&mut self, store: &mut TimelineStore, now: Instant) -> bool {
        if store.snapshots().is_empty() {
            tracing::debug!("play ignored: no snapshots loaded");
            return false;
        }
        if self.state == PlaybackState::Playing {
            return true;
        }
        // Speeds are validated on the way into the store.
        let Ok(period) = self.period_for(store.speed()) else {
            return false;
        };
        let Some(due) = now.checked_add(period) else {
            return false;
        };
        self.schedule(due, period);
        self.state = PlaybackState::Playing;
        store.set_playing(true);
        true
    }

    /// Stop playing and cancel the pending tick.
    pub fn stop(&mut self, store: &mut TimelineStore) {
        self.task = None;
        self.state = PlaybackState::Stopped;
        store.set_playing(false);
    }

    /// Same as [`Self::stop`]; called when the viewer goes away.
    pub fn teardown(&mut self, store: &mut TimelineStore) {
        if self.state == PlaybackState::Playing {
            tracing::debug!("playback torn down while playing");
        }
        self.stop(store);
    }

    /// Play if stopped, stop if playing. Returns whether playback is now on.
    pub fn toggle(&mut self, store: &mut TimelineStore, now: Instant) -> bool {
        match self.state {
            PlaybackState::Playing => {
                self.stop(store);
                false
            }
            PlaybackState::Stopped => self.play(store, now),
        }
    }

    /// Change the speed. While playing, the next tick is due one new period
    /// after `now`.
    ///
    /// # Errors
    ///
    /// Returns the [`Self::period_for`] error and leaves everything unchanged
    /// when `speed` cannot be played.
    pub fn set_speed(
        &mut self,
        store: &mut TimelineStore,
        speed: f64,
        now: Instant,
    ) -> Result<(), PlaybackError> {
        let period = self.period_for(speed)?;
        let due = now
            .checked_add(period)
            .ok_or(PlaybackError::InvalidSpeed(speed))?;
        store.set_speed(speed);
        if self.state == PlaybackState::Playing {
            self.schedule(due, period);
        }
        Ok(())
    }

    /// Run the tick `task_id`, reading the latest index from the store.
    pub fn tick(&mut self, store: &mut TimelineStore, task_id: u64) -> TickOutcome {
        let Some(task) = self.task.filter(|t| t.task_id == task_id) else {
            return TickOutcome::Ignored;
        };

        let len = store.snapshots().len();
        let index = store.current_index();
        if index + 1 >= len {
            self.stop(store);
            return TickOutcome::Finished;
        }

        let next = store.set_current_index(IndexUpdate::To(index + 1));
        match task.due.checked_add(task.period) {
            Some(due) => self.task = Some(ScheduledTick { due, ..task }),
            None => self.stop(store),
        }
        TickOutcome::Advanced(next)
    }

    /// Fire the tick if it is due at or before `now`. Returns whether it fired.
    ///
    /// At most one step is taken per call. When the caller fell behind by more
    /// than a period, the next tick is due one period after `now`.
    pub fn fire_due(&mut self, store: &mut TimelineStore, now: Instant) -> bool {
        let Some(task) = self.task.filter(|t| t.due <= now) else {
            return false;
        };
        self.tick(store, task.task_id);

        if let Some(late) = self.task.filter(|t| t.due <= now) {
            match now.checked_add(late.period) {
                Some(due) => self.task = Some(ScheduledTick { due, ..late }),
                None => self.stop(store),
            }
        }
        true
    }

    fn schedule(&mut self, due: Instant, period: Duration) {
        self.next_task_id += 1;
        self.task = Some(ScheduledTick {
            task_id: self.next_task_id,
            due,
            period,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{company, timeline};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const BASE: Duration = Duration::from_secs(2);

    fn controller() -> PlaybackController {
        PlaybackController::new(BASE, vec![0.5, 1.0, 1.5, 2.0])
    }

    fn loaded(count: usize) -> TimelineStore {
        let mut store = TimelineStore::new();
        let ticket = store.begin_selection(company("a"));
        store.resolve_fetch(&ticket, Ok(timeline("a", count)));
        store
    }

    #[rstest]
    #[case(0.5, 4000)]
    #[case(1.0, 2000)]
    #[case(1.5, 1333)]
    #[case(2.0, 1000)]
    fn period_scales_with_speed(#[case] speed: f64, #[case] millis: u128) {
        let controller = controller();
        assert_eq!(controller.period_for(speed).unwrap().as_millis(), millis);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_speed(#[case] speed: f64) {
        let controller = controller();
        assert!(matches!(
            controller.period_for(speed),
            Err(PlaybackError::InvalidSpeed(_))
        ));
    }

    #[rstest]
    #[case(0.75)]
    #[case(3.0)]
    fn rejects_speed_not_on_offer(#[case] speed: f64) {
        let err = controller().period_for(speed).unwrap_err();
        assert_eq!(
            err,
            PlaybackError::UnsupportedSpeed {
                speed,
                offered: "0.5, 1, 1.5, 2".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unschedulable_speed_is_rejected_and_play_still_works() {
        let mut store = loaded(3);
        let mut controller = PlaybackController::new(BASE, vec![1.0, 1.2e-19]);
        let now = Instant::now();

        assert_eq!(
            controller.set_speed(&mut store, 1.2e-19, now),
            Err(PlaybackError::InvalidSpeed(1.2e-19))
        );
        assert!((store.speed() - 1.0).abs() < f64::EPSILON);
        assert!(controller.toggle(&mut store, now));
        assert_eq!(controller.next_due(), Some(now + BASE));
    }

    #[tokio::test(start_paused = true)]
    async fn late_tick_steps_once_and_delays_the_next() {
        let mut store = loaded(5);
        let mut controller = controller();
        let start = Instant::now();
        controller.play(&mut store, start);

        let late = start + BASE * 3;
        assert!(controller.fire_due(&mut store, late));
        assert_eq!(store.current_index(), 1);
        assert_eq!(controller.next_due(), Some(late + BASE));
        assert!(!controller.fire_due(&mut store, late));
    }

    #[tokio::test(start_paused = true)]
    async fn play_refused_without_snapshots() {
        let mut store = TimelineStore::new();
        let mut controller = controller();
        assert!(!controller.play(&mut store, Instant::now()));
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert!(!store.is_playing());
        assert!(controller.next_due().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn tick_advances_one_step_per_period() {
        let mut store = loaded(3);
        let mut controller = controller();
        let start = Instant::now();
        assert!(controller.play(&mut store, start));
        assert!(store.is_playing());

        assert!(!controller.fire_due(&mut store, start + BASE - Duration::from_millis(1)));
        assert_eq!(store.current_index(), 0);
        assert!(controller.fire_due(&mut store, start + BASE));
        assert_eq!(store.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_at_last_snapshot_stops_without_moving() {
        let mut store = loaded(3);
        store.set_current_index(IndexUpdate::To(2));
        let mut controller = controller();
        let start = Instant::now();
        controller.play(&mut store, start);

        assert!(controller.fire_due(&mut store, start + BASE));
        assert_eq!(store.current_index(), 2);
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert!(!store.is_playing());
        assert!(controller.next_due().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn plays_through_to_the_end() {
        let mut store = loaded(4);
        let mut controller = controller();
        let start = Instant::now();
        controller.play(&mut store, start);

        // Three advances, then the stopping tick.
        let mut now = start;
        for _ in 0..4 {
            now += BASE;
            assert!(controller.fire_due(&mut store, now));
        }
        assert_eq!(store.current_index(), 3);
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert!(!controller.fire_due(&mut store, now + BASE));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_reads_latest_index() {
        let mut store = loaded(5);
        let mut controller = controller();
        let start = Instant::now();
        controller.play(&mut store, start);

        store.set_current_index(IndexUpdate::To(3));
        controller.fire_due(&mut store, start + BASE);
        assert_eq!(store.current_index(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_tick() {
        let mut store = loaded(5);
        let mut controller = controller();
        let start = Instant::now();
        controller.play(&mut store, start);
        let cancelled = controller.scheduled().unwrap();

        controller.stop(&mut store);
        assert!(!controller.fire_due(&mut store, start + BASE * 10));
        assert_eq!(controller.tick(&mut store, cancelled.task_id), TickOutcome::Ignored);
        assert_eq!(store.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_ignores_ticks_from_previous_run() {
        let mut store = loaded(5);
        let mut controller = controller();
        let start = Instant::now();
        controller.play(&mut store, start);
        let old = controller.scheduled().unwrap();
        controller.stop(&mut store);
        controller.play(&mut store, start);

        assert_eq!(controller.tick(&mut store, old.task_id), TickOutcome::Ignored);
        assert_eq!(store.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_reschedules_from_now() {
        let mut store = loaded(5);
        let mut controller = controller();
        let start = Instant::now();
        controller.play(&mut store, start);

        let changed_at = start + Duration::from_millis(1500);
        controller.set_speed(&mut store, 2.0, changed_at).unwrap();
        assert_eq!(controller.next_due(), Some(changed_at + Duration::from_secs(1)));
        assert!((store.speed() - 2.0).abs() < f64::EPSILON);

        // No burst of catch-up ticks.
        assert!(!controller.fire_due(&mut store, changed_at + Duration::from_millis(999)));
        assert!(controller.fire_due(&mut store, changed_at + Duration::from_secs(1)));
        assert_eq!(store.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_speed_leaves_state_alone() {
        let mut store = loaded(2);
        let mut controller = controller();
        let now = Instant::now();
        assert_eq!(
            controller.set_speed(&mut store, 0.0, now),
            Err(PlaybackError::InvalidSpeed(0.0))
        );
        assert!((store.speed() - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_flips_state() {
        let mut store = loaded(2);
        let mut controller = controller();
        let now = Instant::now();
        assert!(controller.toggle(&mut store, now));
        assert!(!controller.toggle(&mut store, now));
        assert!(!store.is_playing());
    }
}
