//! Tokio host for a [`Viewer`].
//!
//! Events, playback deadlines and finished fetches are funnelled through one
//! loop, so the viewer sees them strictly one at a time.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use crate::preload::Preloader;
use crate::source::TimelineSource;
use crate::store::FetchTicket;
use crate::viewer::{Effect, ViewFrame, Viewer, ViewerEvent};

async fn deadline(due: Option<Instant>) {
    match due {
        Some(due) => sleep_until(due).await,
        None => std::future::pending().await,
    }
}

fn spawn_fetch<S: TimelineSource + 'static>(
    source: &Arc<S>,
    ticket: FetchTicket,
    resolved: mpsc::UnboundedSender<ViewerEvent>,
) {
    let source = Arc::clone(source);
    tokio::spawn(async move {
        let result = source
            .fetch_timeline(&ticket.company_id)
            .await
            .map_err(|e| e.user_message());
        // The loop may already be gone; the result is simply dropped.
        let _ = resolved.send(ViewerEvent::FetchResolved { ticket, result });
    });
}

/// Drive `viewer` until `events` closes or a [`ViewerEvent::Shutdown`]
/// arrives. Returns the viewer with playback torn down.
///
/// Fetches run as separate tasks; overlapping fetches are not cancelled,
/// their stale results are discarded by the store. A closed `renders`
/// channel is tolerated.
pub async fn run_viewer<S, P>(
    mut viewer: Viewer,
    source: Arc<S>,
    preloader: Arc<P>,
    mut events: mpsc::Receiver<ViewerEvent>,
    renders: mpsc::Sender<ViewFrame>,
) -> Viewer
where
    S: TimelineSource + 'static,
    P: Preloader + 'static,
{
    let (resolved_tx, mut resolved_rx) = mpsc::unbounded_channel();

    loop {
        let event = tokio::select! {
            biased;
            Some(resolved) = resolved_rx.recv() => resolved,
            () = deadline(viewer.next_due()) => ViewerEvent::Tick,
            event = events.recv() => event.unwrap_or(ViewerEvent::Shutdown),
        };

        let shutdown = matches!(event, ViewerEvent::Shutdown);
        for effect in viewer.handle(event, Instant::now()) {
            match effect {
                Effect::Fetch(ticket) => {
                    tracing::debug!(company_id = %ticket.company_id, generation = ticket.generation, "fetching timeline");
                    spawn_fetch(&source, ticket, resolved_tx.clone());
                }
                Effect::Preload(url) => {
                    let preloader = Arc::clone(&preloader);
                    tokio::spawn(async move { preloader.preload(&url).await });
                }
                Effect::Render => {
                    if renders.send(viewer.frame()).await.is_err() {
                        tracing::trace!("render receiver dropped");
                    }
                }
            }
        }

        if shutdown {
            tracing::debug!("viewer loop stopped");
            return viewer;
        }
    }
}
