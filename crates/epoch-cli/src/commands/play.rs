//! `epoch play`: drive the viewer runtime and print one line per snapshot.

use std::sync::Arc;

use anyhow::{Context, anyhow};
use epoch_config::{EpochConfig, PlaybackConfig};
use epoch_player::client::TimelineParams;
use epoch_player::panel::{ContextPanel, MarkerKind};
use epoch_player::preload::{HttpPreloader, NoopPreloader, Preloader};
use epoch_player::runtime::run_viewer;
use epoch_player::source::{RemoteSource, StoreSource, TimelineSource};
use epoch_player::{ApiClient, ViewFrame, Viewer, ViewerEvent};
use epoch_server::shutdown_signal;
use tokio::sync::mpsc;

use crate::cli::root_commands::PlayArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::params::ParamMap;
use crate::context::AppContext;
use crate::output::render;

/// Nominal scrubber width; the terminal never scrubs.
const TRACK_WIDTH: f64 = 100.0;

/// Handle `epoch play` against the local store.
pub async fn handle_local(args: &PlayArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = ParamMap::default()
        .range(&args.range)
        .set("limit", flags.limit)
        .timeline_query(&ctx.config.general.query_defaults())?;

    let source = StoreSource::new(Arc::clone(&ctx.service), query);
    play(Arc::new(source), Arc::new(NoopPreloader), args, &ctx.config.playback, flags).await
}

/// Handle `epoch play --remote` against `client.api_url`.
pub async fn handle_remote(
    args: &PlayArgs,
    config: &EpochConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let query = ParamMap::default()
        .range(&args.range)
        .set("limit", flags.limit)
        .timeline_query(&config.general.query_defaults())?;

    let client = ApiClient::new(&config.client)?;
    let preloader = HttpPreloader::new(client.http_client());
    let params = TimelineParams {
        start_date: query.range.start,
        end_date: query.range.end,
        limit: flags.limit,
    };
    let source = RemoteSource::new(client, params);
    play(Arc::new(source), Arc::new(preloader), args, &config.playback, flags).await
}

async fn play<S, P>(
    source: Arc<S>,
    preloader: Arc<P>,
    args: &PlayArgs,
    playback: &PlaybackConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()>
where
    S: TimelineSource + 'static,
    P: Preloader + 'static,
{
    let companies = source
        .list_companies()
        .await
        .map_err(|e| anyhow!(e.user_message()))
        .context("failed to load companies")?;
    let company = companies
        .iter()
        .find(|c| c.id == args.company_id)
        .cloned()
        .with_context(|| format!("company {} not found", args.company_id))?;

    let viewer = Viewer::new(playback, TRACK_WIDTH).with_context_panel(args.detail);
    if let Some(speed) = args.speed {
        viewer.playback().period_for(speed)?;
    }

    let (events, events_rx) = mpsc::channel(16);
    let (renders_tx, mut renders) = mpsc::channel(64);
    let handle = tokio::spawn(run_viewer(viewer, source, preloader, events_rx, renders_tx));

    events.send(ViewerEvent::CompaniesLoaded(companies)).await?;
    events.send(ViewerEvent::SelectCompany(company)).await?;
    if let Some(speed) = args.speed {
        events.send(ViewerEvent::SetSpeed(speed)).await?;
    }

    let interrupted = shutdown_signal();
    tokio::pin!(interrupted);

    let mut started = false;
    let mut last_progress: Option<String> = None;
    let outcome = loop {
        let frame = tokio::select! {
            frame = renders.recv() => frame,
            () = &mut interrupted => break Ok(()),
        };
        let Some(frame) = frame else {
            break Ok(());
        };

        if let Some(error) = &frame.error {
            break Err(anyhow!(error.clone()));
        }
        if frame.loading || frame.company.is_none() {
            continue;
        }
        if !started {
            if frame.progress.is_none() {
                break Err(anyhow!("company {} has no snapshots to play", args.company_id));
            }
            started = true;
            events.send(ViewerEvent::TogglePlay).await?;
        }

        if frame.progress != last_progress {
            println!("{}", render_frame(&frame, flags.format)?);
            last_progress.clone_from(&frame.progress);
        }
        if !frame.playing && frame_is_final(&frame) {
            break Ok(());
        }
    };

    drop(events);
    let viewer = handle.await.context("viewer task failed")?;
    tracing::debug!(index = viewer.store().current_index(), "playback finished");
    outcome
}

/// Playback stops itself only after showing the last snapshot.
fn frame_is_final(frame: &ViewFrame) -> bool {
    frame
        .progress
        .as_deref()
        .and_then(|p| p.split_once(" of "))
        .is_some_and(|(at, total)| at == total)
}

/// One line per frame: a human summary for tables, compact JSON otherwise.
fn render_frame(frame: &ViewFrame, format: OutputFormat) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        return render(frame, OutputFormat::Raw);
    }

    let mut line = format!(
        "[{}] {}",
        frame.progress.as_deref().unwrap_or("-"),
        frame
            .snapshot_date
            .map_or_else(|| "----------".to_string(), |d| d.format("%Y-%m-%d").to_string()),
    );
    if let Some(company) = &frame.company {
        line.push_str("  ");
        line.push_str(company);
    }
    if frame.is_major_change {
        line.push_str("  * major change");
    }
    if let Some(milestone) = &frame.milestone {
        line.push_str("  milestone: ");
        line.push_str(milestone);
    }
    if let Some(url) = &frame.screenshot_url {
        line.push_str("  ");
        line.push_str(url);
    }
    if let Some(context) = &frame.context {
        for detail in context_lines(context) {
            line.push_str("\n    ");
            line.push_str(&detail);
        }
    }
    Ok(line)
}

fn context_lines(panel: &ContextPanel) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(years) = panel.company_age_years {
        lines.push(format!("age: {years} years"));
    }
    if let Some(milestone) = &panel.milestone {
        let mut line = format!("milestone [{}] {}", milestone.milestone_type, milestone.title);
        if let Some(description) = &milestone.description {
            line.push_str(": ");
            line.push_str(description);
        }
        lines.push(line);
    }
    if !panel.metrics.is_empty() {
        let metrics: Vec<String> = panel
            .metrics
            .iter()
            .map(|m| format!("{}: {}", m.label, m.value))
            .collect();
        lines.push(metrics.join("  "));
    }
    for source in &panel.sources {
        let publisher = source
            .publisher
            .as_deref()
            .map_or_else(String::new, |p| format!(" ({p})"));
        lines.push(format!(
            "source [{}] {}{publisher}  {}",
            source.source_type, source.title, source.url
        ));
    }
    if let Some(commentary) = &panel.commentary {
        for (label, text) in [
            ("commentary", &commentary.text),
            ("design notes", &commentary.design_notes),
            ("business", &commentary.business_context),
        ] {
            if let Some(text) = text {
                lines.push(format!("{label}: {text}"));
            }
        }
        if !commentary.tags.is_empty() {
            let tags: Vec<String> = commentary.tags.iter().map(|t| format!("#{t}")).collect();
            lines.push(format!("tags: {}", tags.join(" ")));
        }
    }
    if let Some(design) = &panel.design {
        let mut parts = Vec::new();
        if !design.colors.is_empty() {
            parts.push(format!("colors {}", design.colors.join(", ")));
        }
        if !design.fonts.is_empty() {
            parts.push(format!("fonts {}", design.fonts.join(", ")));
        }
        if let Some(layout) = &design.layout_type {
            parts.push(format!("layout {layout}"));
        }
        if let Some(mobile) = design.has_mobile_version {
            parts.push(format!("mobile {}", if mobile { "yes" } else { "no" }));
        }
        if let Some(kb) = design.page_weight_kb {
            parts.push(format!("{kb} KB"));
        }
        if !parts.is_empty() {
            lines.push(format!("design: {}", parts.join("  ")));
        }
    }
    if !panel.markers.is_empty() {
        let markers: Vec<String> = panel
            .markers
            .iter()
            .map(|m| match (&m.kind, &m.label) {
                (MarkerKind::Milestone, Some(label)) => format!("{:.0}% {label}", m.percent),
                _ => format!("{:.0}% *", m.percent),
            })
            .collect();
        lines.push(format!("markers: {}", markers.join("  ")));
    }
    lines
}
