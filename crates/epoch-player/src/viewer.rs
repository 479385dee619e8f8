//! The viewer: one reducer over every input the timeline reacts to.
//!
//! [`Viewer::handle`] is synchronous and does no I/O. It returns the
//! [`Effect`]s the host must carry out (fetch a timeline, warm a screenshot,
//! redraw). [`crate::runtime::run_viewer`] is the tokio host.

use chrono::{DateTime, Utc};
use epoch_config::PlaybackConfig;
use epoch_core::entities::Company;
use epoch_core::timeline::TimelineData;
use serde::Serialize;
use tokio::time::Instant;

use crate::keyboard::{Key, KeyAction, KeyOutcome, outcome_for};
use crate::panel::ContextPanel;
use crate::playback::{PlaybackController, PlaybackState};
use crate::scrubber::{Scrubber, preload_targets, thumb_position_percent};
use crate::store::{FetchResolution, FetchTicket, IndexUpdate, TimelineStore};

#[derive(Debug)]
pub enum ViewerEvent {
    CompaniesLoaded(Vec<Company>),
    SelectCompany(Company),
    FetchResolved {
        ticket: FetchTicket,
        result: Result<TimelineData, String>,
    },
    Key(Key),
    PointerDown(f64),
    PointerMove(f64),
    PointerUp,
    TogglePlay,
    SetSpeed(f64),
    /// The playback deadline passed.
    Tick,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the timeline for `ticket.company_id` and answer with
    /// [`ViewerEvent::FetchResolved`].
    Fetch(FetchTicket),
    Preload(String),
    Render,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFrame {
    pub company: Option<String>,
    pub progress: Option<String>,
    pub snapshot_date: Option<DateTime<Utc>>,
    pub screenshot_url: Option<String>,
    pub is_major_change: bool,
    pub milestone: Option<String>,
    pub thumb_percent: f64,
    pub playing: bool,
    pub speed: f64,
    pub loading: bool,
    pub error: Option<String>,
    /// Present only when the viewer was built with the context panel on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextPanel>,
}

#[derive(Debug)]
pub struct Viewer {
    store: TimelineStore,
    playback: PlaybackController,
    scrubber: Scrubber,
    show_context: bool,
}

impl Viewer {
    /// A viewer at `config.default_speed`, or at 1.0 when that speed is not
    /// offered.
    #[must_use]
    pub fn new(config: &PlaybackConfig, track_width: f64) -> Self {
        let mut store = TimelineStore::new();
        let playback = PlaybackController::from_config(config);
        if playback.period_for(config.default_speed).is_ok() {
            store.set_speed(config.default_speed);
        }
        Self {
            store,
            playback,
            scrubber: Scrubber::new(track_width),
            show_context: false,
        }
    }

    /// Attach a [`ContextPanel`] to every frame.
    #[must_use]
    pub const fn with_context_panel(mut self, on: bool) -> Self {
        self.show_context = on;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &TimelineStore {
        &self.store
    }

    #[must_use]
    pub const fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    #[must_use]
    pub const fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.playback.next_due()
    }

    pub fn handle(&mut self, event: ViewerEvent, now: Instant) -> Vec<Effect> {
        match event {
            ViewerEvent::CompaniesLoaded(companies) => {
                self.store.set_companies(companies);
                vec![Effect::Render]
            }
            ViewerEvent::SelectCompany(company) => {
                self.playback.stop(&mut self.store);
                self.scrubber.pointer_up();
                let ticket = self.store.begin_selection(company);
                vec![Effect::Fetch(ticket), Effect::Render]
            }
            ViewerEvent::FetchResolved { ticket, result } => {
                match self.store.resolve_fetch(&ticket, result) {
                    FetchResolution::Applied => self.index_changed(),
                    FetchResolution::Superseded => Vec::new(),
                }
            }
            ViewerEvent::Key(key) => self.handle_key(&key, now).1,
            ViewerEvent::PointerDown(x) => {
                let before = self.store.current_index();
                match self.scrubber.pointer_down(&mut self.store, x) {
                    Some(index) if index != before => self.index_changed(),
                    Some(_) => vec![Effect::Render],
                    None => Vec::new(),
                }
            }
            ViewerEvent::PointerMove(x) => {
                let before = self.store.current_index();
                match self.scrubber.pointer_move(&mut self.store, x) {
                    Some(index) if index != before => self.index_changed(),
                    _ => Vec::new(),
                }
            }
            ViewerEvent::PointerUp => {
                self.scrubber.pointer_up();
                Vec::new()
            }
            ViewerEvent::TogglePlay => {
                self.playback.toggle(&mut self.store, now);
                vec![Effect::Render]
            }
            ViewerEvent::SetSpeed(speed) => {
                if let Err(error) = self.playback.set_speed(&mut self.store, speed, now) {
                    tracing::warn!(%error, "speed change rejected");
                    return Vec::new();
                }
                vec![Effect::Render]
            }
            ViewerEvent::Tick => {
                let before = self.store.current_index();
                let was_playing = self.playback.state() == PlaybackState::Playing;
                if !self.playback.fire_due(&mut self.store, now) {
                    return Vec::new();
                }
                if self.store.current_index() != before {
                    self.index_changed()
                } else if was_playing {
                    vec![Effect::Render]
                } else {
                    Vec::new()
                }
            }
            ViewerEvent::Shutdown => {
                self.playback.teardown(&mut self.store);
                Vec::new()
            }
        }
    }

    /// Apply a key press. The outcome tells the host whether to suppress the
    /// key's default action.
    pub fn handle_key(&mut self, key: &Key, now: Instant) -> (KeyOutcome, Vec<Effect>) {
        let outcome = outcome_for(key);
        let KeyOutcome::PreventDefault(action) = outcome else {
            return (outcome, Vec::new());
        };

        let index = self.store.current_index();
        let len = self.store.snapshots().len();
        let effects = match action {
            KeyAction::Previous if index > 0 => {
                self.store.set_current_index(IndexUpdate::with(|prev| prev.saturating_sub(1)));
                self.index_changed()
            }
            KeyAction::Next if index + 1 < len => {
                self.store.set_current_index(IndexUpdate::with(|prev| prev + 1));
                self.index_changed()
            }
            KeyAction::Previous | KeyAction::Next => Vec::new(),
            KeyAction::TogglePlay => {
                self.playback.toggle(&mut self.store, now);
                vec![Effect::Render]
            }
        };
        (outcome, effects)
    }

    fn index_changed(&self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = preload_targets(self.store.snapshots(), self.store.current_index())
            .into_iter()
            .map(Effect::Preload)
            .collect();
        effects.push(Effect::Render);
        effects
    }

    #[must_use]
    pub fn frame(&self) -> ViewFrame {
        let store = &self.store;
        let snapshot = store.current_snapshot();
        ViewFrame {
            company: store.selected_company().map(|c| c.name.clone()),
            progress: store.progress_label(),
            snapshot_date: snapshot.map(|s| s.snapshot_date),
            screenshot_url: snapshot.and_then(|s| s.screenshot_url.clone()),
            is_major_change: snapshot.is_some_and(|s| s.is_major_change),
            milestone: store.current_milestone().map(|m| m.title.clone()),
            thumb_percent: thumb_position_percent(store.current_index(), store.snapshots().len()),
            playing: store.is_playing(),
            speed: store.speed(),
            loading: store.is_loading(),
            error: store.error().map(str::to_string),
            context: if self.show_context {
                ContextPanel::build(store)
            } else {
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{company, timeline};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn viewer() -> Viewer {
        Viewer::new(&PlaybackConfig::default(), 100.0)
    }

    fn loaded(count: usize) -> Viewer {
        let mut viewer = viewer();
        let now = Instant::now();
        let effects = viewer.handle(ViewerEvent::SelectCompany(company("a")), now);
        let Some(Effect::Fetch(ticket)) = effects.into_iter().next() else {
            panic!("expected fetch");
        };
        viewer.handle(
            ViewerEvent::FetchResolved {
                ticket,
                result: Ok(timeline("a", count)),
            },
            now,
        );
        viewer
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_company_requests_fetch() {
        let mut viewer = viewer();
        let effects = viewer.handle(ViewerEvent::SelectCompany(company("a")), Instant::now());
        assert_eq!(
            effects,
            vec![
                Effect::Fetch(FetchTicket {
                    generation: 1,
                    company_id: "a".into()
                }),
                Effect::Render
            ]
        );
        assert!(viewer.frame().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn applied_fetch_preloads_neighbors() {
        let mut viewer = viewer();
        let now = Instant::now();
        viewer.handle(ViewerEvent::SelectCompany(company("a")), now);
        let effects = viewer.handle(
            ViewerEvent::FetchResolved {
                ticket: FetchTicket {
                    generation: 1,
                    company_id: "a".into(),
                },
                result: Ok(timeline("a", 4)),
            },
            now,
        );
        assert_eq!(
            effects,
            vec![
                Effect::Preload("https://shots.example/a/1.png".into()),
                Effect::Preload("https://shots.example/a/2.png".into()),
                Effect::Render,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_fetch_has_no_effects() {
        let mut viewer = viewer();
        let now = Instant::now();
        viewer.handle(ViewerEvent::SelectCompany(company("a")), now);
        viewer.handle(ViewerEvent::SelectCompany(company("b")), now);
        let effects = viewer.handle(
            ViewerEvent::FetchResolved {
                ticket: FetchTicket {
                    generation: 1,
                    company_id: "a".into(),
                },
                result: Ok(timeline("a", 4)),
            },
            now,
        );
        assert!(effects.is_empty());
        assert!(viewer.store().snapshots().is_empty());
        assert_eq!(viewer.frame().company.as_deref(), Some("B"));
    }

    #[tokio::test(start_paused = true)]
    async fn arrows_step_and_stop_at_ends() {
        let mut viewer = loaded(3);
        let now = Instant::now();

        let (outcome, effects) = viewer.handle_key(&Key::ArrowLeft, now);
        assert!(outcome.prevents_default());
        assert!(effects.is_empty());
        assert_eq!(viewer.store().current_index(), 0);

        viewer.handle(ViewerEvent::Key(Key::ArrowRight), now);
        viewer.handle(ViewerEvent::Key(Key::ArrowRight), now);
        let (_, effects) = viewer.handle_key(&Key::ArrowRight, now);
        assert!(effects.is_empty());
        assert_eq!(viewer.store().current_index(), 2);

        viewer.handle(ViewerEvent::Key(Key::ArrowLeft), now);
        assert_eq!(viewer.store().current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn other_keys_are_ignored() {
        let mut viewer = loaded(3);
        let (outcome, effects) = viewer.handle_key(&Key::Other("Enter".into()), Instant::now());
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert!(effects.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_company_stops_playback() {
        let mut viewer = loaded(3);
        let now = Instant::now();
        viewer.handle(ViewerEvent::Key(Key::Space), now);
        assert!(viewer.store().is_playing());

        viewer.handle(ViewerEvent::SelectCompany(company("b")), now);
        assert!(!viewer.store().is_playing());
        assert!(viewer.next_due().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn tick_advances_and_renders() {
        let mut viewer = loaded(3);
        let start = Instant::now();
        viewer.handle(ViewerEvent::TogglePlay, start);

        let effects = viewer.handle(ViewerEvent::Tick, start + Duration::from_secs(2));
        assert_eq!(viewer.store().current_index(), 1);
        assert_eq!(effects.last(), Some(&Effect::Render));
        assert_eq!(viewer.frame().progress.as_deref(), Some("2 of 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn early_tick_does_nothing() {
        let mut viewer = loaded(3);
        let start = Instant::now();
        viewer.handle(ViewerEvent::TogglePlay, start);
        assert!(viewer.handle(ViewerEvent::Tick, start).is_empty());
        assert_eq!(viewer.store().current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn scrubbing_updates_thumb() {
        let mut viewer = loaded(5);
        let now = Instant::now();
        viewer.handle(ViewerEvent::PointerDown(50.0), now);
        assert!((viewer.frame().thumb_percent - 50.0).abs() < f64::EPSILON);
        viewer.handle(ViewerEvent::PointerMove(1000.0), now);
        assert_eq!(viewer.store().current_index(), 4);
        viewer.handle(ViewerEvent::PointerUp, now);
        viewer.handle(ViewerEvent::PointerMove(0.0), now);
        assert_eq!(viewer.store().current_index(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_speed_is_rejected_quietly() {
        let mut viewer = loaded(2);
        assert!(viewer.handle(ViewerEvent::SetSpeed(-2.0), Instant::now()).is_empty());
        assert!((viewer.frame().speed - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_outside_offered_list_is_rejected() {
        let mut viewer = loaded(2);
        assert!(viewer.handle(ViewerEvent::SetSpeed(3.0), Instant::now()).is_empty());
        assert!((viewer.frame().speed - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn unschedulable_speed_never_reaches_playback() {
        let config = PlaybackConfig {
            speeds: vec![1.0, 1.2e-19],
            ..PlaybackConfig::default()
        };
        let mut viewer = Viewer::new(&config, 100.0);
        let now = Instant::now();
        let effects = viewer.handle(ViewerEvent::SelectCompany(company("a")), now);
        let Some(Effect::Fetch(ticket)) = effects.into_iter().next() else {
            panic!("expected fetch");
        };
        viewer.handle(
            ViewerEvent::FetchResolved {
                ticket,
                result: Ok(timeline("a", 2)),
            },
            now,
        );

        assert!(viewer.handle(ViewerEvent::SetSpeed(1.2e-19), now).is_empty());
        viewer.handle(ViewerEvent::TogglePlay, now);
        assert!(viewer.store().is_playing());
        assert_eq!(viewer.next_due(), Some(now + Duration::from_secs(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn unoffered_default_speed_falls_back_to_normal() {
        let config = PlaybackConfig {
            default_speed: 3.0,
            ..PlaybackConfig::default()
        };
        assert!((Viewer::new(&config, 100.0).frame().speed - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn context_panel_is_opt_in() {
        assert!(loaded(2).frame().context.is_none());

        let mut viewer = viewer().with_context_panel(true);
        assert!(viewer.frame().context.is_none(), "nothing on screen yet");
        let now = Instant::now();
        let effects = viewer.handle(ViewerEvent::SelectCompany(company("a")), now);
        let Some(Effect::Fetch(ticket)) = effects.into_iter().next() else {
            panic!("expected fetch");
        };
        viewer.handle(
            ViewerEvent::FetchResolved {
                ticket,
                result: Ok(timeline("a", 3)),
            },
            now,
        );
        let context = viewer.frame().context.unwrap();
        assert_eq!(context.markers.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_tears_down_playback() {
        let mut viewer = loaded(3);
        let now = Instant::now();
        viewer.handle(ViewerEvent::TogglePlay, now);
        viewer.handle(ViewerEvent::Shutdown, now);
        assert!(viewer.next_due().is_none());
        assert!(!viewer.store().is_playing());
    }
}
