//! # epoch-player
//!
//! Client-side timeline browsing: an owned [`store::TimelineStore`], the
//! auto-advance [`playback::PlaybackController`], pointer scrubbing, keyboard
//! shortcuts, the [`panel::ContextPanel`] for the snapshot on screen, and a
//! [`viewer::Viewer`] reducer tying them together.
//! [`runtime::run_viewer`] hosts a viewer on tokio, loading data through a
//! [`source::TimelineSource`] (the HTTP [`client::ApiClient`] or a local
//! store).

pub mod client;
pub mod error;
pub mod keyboard;
pub mod panel;
pub mod playback;
pub mod preload;
pub mod runtime;
pub mod scrubber;
pub mod source;
pub mod store;
pub mod viewer;

pub use client::ApiClient;
pub use error::ClientError;
pub use viewer::{Effect, ViewFrame, Viewer, ViewerEvent};
