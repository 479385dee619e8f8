//! Context for the snapshot on screen: company stats, milestone metrics,
//! sources, commentary, design analysis and the markers along the track.

use chrono::Datelike;
use epoch_core::entities::{Commentary, DesignAnalysis, Milestone, Source};
use epoch_core::enums::{MilestoneType, SourceType};
use epoch_core::format::{metric_display, metric_label};
use serde::Serialize;

use crate::scrubber::{major_change_markers, milestone_markers};
use crate::store::TimelineStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneLine {
    pub title: String,
    #[serde(rename = "type")]
    pub milestone_type: MilestoneType,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLine {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub title: String,
    pub publisher: Option<String>,
    pub url: String,
}

impl From<&Source> for SourceLine {
    fn from(source: &Source) -> Self {
        Self {
            source_type: source.source_type,
            title: source.title.clone(),
            publisher: source.publisher.clone(),
            url: source.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryPanel {
    pub text: Option<String>,
    pub design_notes: Option<String>,
    pub business_context: Option<String>,
    pub tags: Vec<String>,
}

impl From<&Commentary> for CommentaryPanel {
    fn from(commentary: &Commentary) -> Self {
        Self {
            text: commentary.commentary_text.clone(),
            design_notes: commentary.design_notes.clone(),
            business_context: commentary.business_context.clone(),
            tags: commentary.tag_list(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignPanel {
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
    pub layout_type: Option<String>,
    pub has_mobile_version: Option<bool>,
    pub page_weight_kb: Option<i64>,
}

impl From<&DesignAnalysis> for DesignPanel {
    fn from(analysis: &DesignAnalysis) -> Self {
        Self {
            colors: analysis.primary_color_list(),
            fonts: analysis.font_list(),
            layout_type: analysis.layout_type.clone(),
            has_mobile_version: analysis.has_mobile_version,
            page_weight_kb: analysis.page_weight_kb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    MajorChange,
    Milestone,
}

/// A tick on the track, positioned in percent of its width.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMarker {
    pub kind: MarkerKind,
    pub percent: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextPanel {
    /// Whole years between founding and the snapshot. Omitted below one.
    pub company_age_years: Option<i32>,
    pub milestone: Option<MilestoneLine>,
    pub metrics: Vec<MetricLine>,
    pub sources: Vec<SourceLine>,
    pub commentary: Option<CommentaryPanel>,
    pub design: Option<DesignPanel>,
    pub markers: Vec<TrackMarker>,
}

impl ContextPanel {
    /// Panel for the current snapshot, or `None` when nothing is on screen.
    #[must_use]
    pub fn build(store: &TimelineStore) -> Option<Self> {
        let snapshot = store.current_snapshot()?;
        let milestone = store.current_milestone();

        let company_age_years = store
            .selected_company()
            .and_then(|c| c.founded_date)
            .map(|founded| snapshot.snapshot_date.year() - founded.year())
            .filter(|years| *years > 0);

        Some(Self {
            company_age_years,
            milestone: milestone.map(|m| MilestoneLine {
                title: m.title.clone(),
                milestone_type: m.milestone_type,
                description: m.description.clone(),
            }),
            metrics: milestone.map(metric_lines).unwrap_or_default(),
            sources: snapshot.sources.iter().map(SourceLine::from).collect(),
            commentary: snapshot.effective_commentary().map(CommentaryPanel::from),
            design: snapshot.effective_design_analysis().map(DesignPanel::from),
            markers: track_markers(store),
        })
    }
}

fn metric_lines(milestone: &Milestone) -> Vec<MetricLine> {
    milestone
        .metrics
        .iter()
        .flatten()
        .map(|(key, value)| MetricLine {
            label: metric_label(key),
            value: metric_display(key, value),
        })
        .collect()
}

/// Major changes first, then milestones, each in track order.
fn track_markers(store: &TimelineStore) -> Vec<TrackMarker> {
    let snapshots = store.snapshots();
    let majors = major_change_markers(snapshots).into_iter().map(|percent| TrackMarker {
        kind: MarkerKind::MajorChange,
        percent,
        label: None,
    });
    let milestones = milestone_markers(snapshots, store.milestones())
        .into_iter()
        .map(|(percent, m)| TrackMarker {
            kind: MarkerKind::Milestone,
            percent,
            label: Some(m.title.clone()),
        });
    majors.chain(milestones).collect()
}
