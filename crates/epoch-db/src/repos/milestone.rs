//! Milestone repository.

use chrono::Utc;

use epoch_core::entities::Milestone;
use epoch_core::ids::PREFIX_MILESTONE;
use epoch_core::requests::NewMilestone;

use crate::error::DatabaseError;
use crate::filters::MilestoneFilter;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, parse_enum, parse_metrics};
use crate::service::EpochService;

const SELECT_COLS: &str =
    "id, company_id, milestone_date, type, title, description, metrics, created_at";

fn row_to_milestone(row: &libsql::Row) -> Result<Milestone, DatabaseError> {
    Ok(Milestone {
        id: row.get(0)?,
        company_id: row.get(1)?,
        milestone_date: parse_datetime(&row.get::<String>(2)?)?,
        milestone_type: parse_enum(&row.get::<String>(3)?)?,
        title: row.get(4)?,
        description: get_opt_string(row, 5)?,
        metrics: parse_metrics(get_opt_string(row, 6)?.as_deref()),
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl EpochService {
    /// Insert a milestone for an existing company.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the company does not exist, or
    /// `DatabaseError::Core` if the title is blank.
    pub async fn create_milestone(&self, input: &NewMilestone) -> Result<Milestone, DatabaseError> {
        input.validate()?;
        self.get_company(&input.company_id).await?;
        let id = self.db().generate_id(PREFIX_MILESTONE).await?;
        let metrics = input
            .metrics
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| DatabaseError::Other(e.into()))?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO milestones ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                libsql::params![
                    id.as_str(),
                    input.company_id.as_str(),
                    format_datetime(input.milestone_date),
                    input.milestone_type.as_str(),
                    input.title.as_str(),
                    input.description.as_deref(),
                    metrics,
                    format_datetime(Utc::now())
                ],
            )
            .await?;

        self.get_milestone(&id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no milestone has this id.
    pub async fn get_milestone(&self, id: &str) -> Result<Milestone, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM milestones WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_milestone(&row)
    }

    /// Milestones matching `filter`, date-ascending. Equal dates keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_milestones(
        &self,
        filter: &MilestoneFilter,
    ) -> Result<Vec<Milestone>, DatabaseError> {
        let clause = filter.where_clause();
        let sql = format!(
            "SELECT {SELECT_COLS} FROM milestones {} ORDER BY milestone_date ASC, rowid ASC",
            clause.sql
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(clause.params))
            .await?;

        let mut milestones = Vec::new();
        while let Some(row) = rows.next().await? {
            milestones.push(row_to_milestone(&row)?);
        }
        Ok(milestones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{day, make_company, make_milestone, test_service};
    use epoch_core::entities::MetricValue;
    use epoch_core::enums::MilestoneType;
    use epoch_core::query::DateRange;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn create_milestone_with_metrics() {
        let svc = test_service().await;
        let apple = make_company(&svc, "Apple").await;
        let mut metrics = BTreeMap::new();
        metrics.insert("employees".to_string(), MetricValue::Number(21_600.0));
        metrics.insert("revenue".to_string(), MetricValue::Number(24_000_000_000.0));

        let milestone = svc
            .create_milestone(&NewMilestone {
                company_id: apple.id.clone(),
                milestone_date: day(2007, 1, 9),
                milestone_type: MilestoneType::Product,
                title: "iPhone Launch".into(),
                description: Some("Macworld keynote".into()),
                metrics: Some(metrics.clone()),
            })
            .await
            .unwrap();

        assert!(milestone.id.starts_with("mst-"));
        assert_eq!(milestone.metrics, Some(metrics));
        assert_eq!(milestone.milestone_type, MilestoneType::Product);
    }

    #[tokio::test]
    async fn malformed_metrics_read_as_none() {
        let svc = test_service().await;
        let apple = make_company(&svc, "Apple").await;
        let milestone = make_milestone(&svc, &apple.id, day(2007, 1, 9), "iPhone").await;
        svc.db()
            .conn()
            .execute(
                "UPDATE milestones SET metrics = '{oops' WHERE id = ?1",
                [milestone.id.as_str()],
            )
            .await
            .unwrap();

        let read = svc.get_milestone(&milestone.id).await.unwrap();
        assert_eq!(read.metrics, None);
    }

    #[tokio::test]
    async fn milestone_for_missing_company_is_no_result() {
        let svc = test_service().await;
        let result = svc
            .create_milestone(&NewMilestone {
                company_id: "cmp-missing".into(),
                milestone_date: day(2004, 8, 19),
                milestone_type: MilestoneType::Funding,
                title: "IPO".into(),
                description: None,
                metrics: None,
            })
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn list_is_ascending_and_range_bounded() {
        let svc = test_service().await;
        let apple = make_company(&svc, "Apple").await;
        make_milestone(&svc, &apple.id, day(2010, 1, 1), "c").await;
        make_milestone(&svc, &apple.id, day(2000, 1, 1), "a").await;
        make_milestone(&svc, &apple.id, day(2005, 1, 1), "b").await;

        let all = svc
            .list_milestones(&MilestoneFilter {
                company_id: Some(apple.id.clone()),
                ..MilestoneFilter::default()
            })
            .await
            .unwrap();
        let titles: Vec<_> = all.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);

        let bounded = svc
            .list_milestones(&MilestoneFilter {
                company_id: Some(apple.id.clone()),
                range: DateRange {
                    start: Some(day(2005, 1, 1)),
                    end: None,
                },
            })
            .await
            .unwrap();
        assert_eq!(bounded.len(), 2);
    }
}
