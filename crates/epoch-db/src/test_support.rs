//! Shared test utilities for epoch-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{DateTime, Utc};
    use epoch_core::dates::utc_date;
    use epoch_core::entities::{Company, Milestone, Snapshot};
    use epoch_core::enums::MilestoneType;
    use epoch_core::requests::{NewCompany, NewMilestone, NewSnapshot};

    use crate::service::EpochService;

    /// Create an in-memory service.
    pub async fn test_service() -> EpochService {
        EpochService::new_local(":memory:").await.unwrap()
    }

    pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        utc_date(y, m, d).unwrap()
    }

    pub async fn make_company(svc: &EpochService, name: &str) -> Company {
        svc.create_company(&NewCompany {
            name: name.into(),
            domain: format!("{}.com", name.to_lowercase()),
            founded_date: None,
            industry: None,
        })
        .await
        .unwrap()
    }

    pub async fn make_snapshot(
        svc: &EpochService,
        company_id: &str,
        date: DateTime<Utc>,
        major: bool,
    ) -> Snapshot {
        svc.create_snapshot(&NewSnapshot {
            company_id: company_id.into(),
            snapshot_date: date,
            wayback_url: None,
            screenshot_url: Some(format!("https://example.com/{}.png", date.date_naive())),
            thumbnail_url: None,
            is_major_change: major,
        })
        .await
        .unwrap()
    }

    pub async fn make_milestone(
        svc: &EpochService,
        company_id: &str,
        date: DateTime<Utc>,
        title: &str,
    ) -> Milestone {
        svc.create_milestone(&NewMilestone {
            company_id: company_id.into(),
            milestone_date: date,
            milestone_type: MilestoneType::Product,
            title: title.into(),
            description: None,
            metrics: None,
        })
        .await
        .unwrap()
    }
}
