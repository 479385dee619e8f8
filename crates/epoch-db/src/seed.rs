//! Demo data for local exploration.

use std::collections::BTreeMap;

use epoch_core::dates::utc_date;
use epoch_core::entities::MetricValue;
use epoch_core::enums::{MilestoneType, SourceType};
use epoch_core::requests::{
    NewCommentary, NewCompany, NewDesignAnalysis, NewMilestone, NewSnapshot, NewSource,
};
use serde::Serialize;

use crate::error::DatabaseError;
use crate::service::EpochService;

/// What [`EpochService::seed_demo_data`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// True when the store already had companies and nothing was inserted.
    pub skipped: bool,
    pub companies: u32,
    pub snapshots: u32,
    pub milestones: u32,
}

fn date(y: i32, m: u32, d: u32) -> Result<chrono::DateTime<chrono::Utc>, DatabaseError> {
    utc_date(y, m, d).ok_or_else(|| DatabaseError::InvalidState(format!("bad seed date {y}-{m}-{d}")))
}

fn metrics(pairs: &[(&str, f64)]) -> BTreeMap<String, MetricValue> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), MetricValue::Number(*v)))
        .collect()
}

impl EpochService {
    /// Insert sample companies, snapshots and milestones. Does nothing when
    /// any company already exists.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if an insert fails.
    pub async fn seed_demo_data(&self) -> Result<SeedSummary, DatabaseError> {
        if !self.list_companies().await?.is_empty() {
            tracing::info!("store already has companies; skipping seed");
            return Ok(SeedSummary {
                skipped: true,
                ..SeedSummary::default()
            });
        }

        let apple = self
            .create_company(&NewCompany {
                name: "Apple Inc.".into(),
                domain: "apple.com".into(),
                founded_date: Some(date(1976, 4, 1)?),
                industry: Some("Technology".into()),
            })
            .await?;
        let google = self
            .create_company(&NewCompany {
                name: "Google".into(),
                domain: "google.com".into(),
                founded_date: Some(date(1998, 9, 4)?),
                industry: Some("Technology".into()),
            })
            .await?;
        self.create_company(&NewCompany {
            name: "Netflix".into(),
            domain: "netflix.com".into(),
            founded_date: Some(date(1997, 8, 29)?),
            industry: Some("Entertainment".into()),
        })
        .await?;

        self.create_snapshot(&NewSnapshot {
            company_id: apple.id.clone(),
            snapshot_date: date(2000, 3, 15)?,
            wayback_url: Some("https://web.archive.org/web/20000315000000*/apple.com".into()),
            screenshot_url: Some("https://example.com/screenshots/apple-2000.png".into()),
            thumbnail_url: Some("https://example.com/thumbnails/apple-2000.png".into()),
            is_major_change: true,
        })
        .await?;
        let iphone_era = self
            .create_snapshot(&NewSnapshot {
                company_id: apple.id.clone(),
                snapshot_date: date(2007, 1, 9)?,
                wayback_url: Some("https://web.archive.org/web/20070109000000*/apple.com".into()),
                screenshot_url: Some("https://example.com/screenshots/apple-2007.png".into()),
                thumbnail_url: Some("https://example.com/thumbnails/apple-2007.png".into()),
                is_major_change: true,
            })
            .await?;

        self.create_milestone(&NewMilestone {
            company_id: apple.id.clone(),
            milestone_date: date(2007, 1, 9)?,
            milestone_type: MilestoneType::Product,
            title: "iPhone Launch".into(),
            description: Some("Steve Jobs announces the first iPhone at Macworld".into()),
            metrics: Some(metrics(&[("employees", 21_600.0), ("revenue", 24_000_000_000.0)])),
        })
        .await?;
        self.create_milestone(&NewMilestone {
            company_id: google.id.clone(),
            milestone_date: date(2004, 8, 19)?,
            milestone_type: MilestoneType::Funding,
            title: "IPO".into(),
            description: Some("Google goes public with IPO".into()),
            metrics: Some(metrics(&[("employees", 3_000.0), ("marketCap", 23_000_000_000.0)])),
        })
        .await?;

        self.create_source(
            &iphone_era.id,
            &NewSource {
                source_type: SourceType::News,
                title: "Apple Introduces iPhone".into(),
                url: "https://www.apple.com/newsroom/2007/01/09Apple-Introduces-iPhone/".into(),
                publisher: Some("Apple Newsroom".into()),
                publish_date: Some(date(2007, 1, 9)?),
                excerpt: Some("Apple today introduced iPhone, combining three products...".into()),
            },
        )
        .await?;
        self.create_commentary(
            &iphone_era.id,
            &NewCommentary {
                commentary_text: Some(
                    "This redesign coincided with the iPhone launch, showing Apple's shift toward mobile-first thinking."
                        .into(),
                ),
                design_notes: Some(
                    "Clean, minimalist design with prominent iPhone imagery. Heavy use of white space."
                        .into(),
                ),
                business_context: Some(
                    "Major pivot moment for Apple, moving from computer company to mobile device leader."
                        .into(),
                ),
                tags: ["iphone", "mobile", "redesign", "minimalist"]
                    .map(String::from)
                    .to_vec(),
            },
        )
        .await?;
        self.create_design_analysis(
            &iphone_era.id,
            &NewDesignAnalysis {
                primary_colors: ["#000000", "#FFFFFF", "#007AFF"].map(String::from).to_vec(),
                fonts: ["Helvetica Neue", "Arial"].map(String::from).to_vec(),
                layout_type: Some("grid".into()),
                has_mobile_version: Some(false),
                page_weight_kb: Some(125),
            },
        )
        .await?;

        let summary = SeedSummary {
            skipped: false,
            companies: 3,
            snapshots: 2,
            milestones: 2,
        };
        tracing::info!(?summary, "seeded demo data");
        Ok(summary)
    }
}
