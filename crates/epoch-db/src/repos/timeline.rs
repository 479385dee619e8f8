//! Timeline and paginated snapshot queries for one company.
//!
//! Both return data date-ascending. Callers never re-sort what comes back.

use epoch_core::pagination::{Pagination, SnapshotPage};
use epoch_core::query::{SnapshotPageQuery, TimelineQuery};
use epoch_core::timeline::TimelineData;

use crate::error::DatabaseError;
use crate::filters::{MilestoneFilter, SnapshotFilter};
use crate::repos::snapshot::Attachments;
use crate::service::EpochService;

/// Sources embedded per snapshot in the timeline feed.
const TIMELINE_SOURCES: u32 = 3;
/// Sources embedded per snapshot in a snapshot page.
const PAGE_SOURCES: u32 = 2;

impl EpochService {
    /// Snapshots and milestones of a company within the query's inclusive date
    /// range, merged into one chronological feed.
    ///
    /// Snapshots are limited to the first `query.limit` after the ascending
    /// sort and carry their newest sources, commentary and design analysis.
    /// Milestones are not limited. An unknown company yields empty lists.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn get_timeline(
        &self,
        company_id: &str,
        query: &TimelineQuery,
    ) -> Result<TimelineData, DatabaseError> {
        let snapshot_filter = SnapshotFilter {
            range: query.range,
            limit: Some(query.limit),
            ..SnapshotFilter::for_company(company_id)
        };
        let snapshots = self
            .list_snapshots(
                &snapshot_filter,
                Attachments::with_sources(TIMELINE_SOURCES, true),
            )
            .await?;
        let milestones = self
            .list_milestones(&MilestoneFilter {
                company_id: Some(company_id.to_string()),
                range: query.range,
            })
            .await?;

        tracing::debug!(
            company_id,
            snapshots = snapshots.len(),
            milestones = milestones.len(),
            "timeline assembled"
        );
        Ok(TimelineData::assemble(snapshots, milestones))
    }

    /// One page of a company's snapshots plus the total across all pages.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn list_snapshot_page(
        &self,
        company_id: &str,
        query: &SnapshotPageQuery,
    ) -> Result<SnapshotPage, DatabaseError> {
        let filter = SnapshotFilter {
            range: query.range,
            major_changes_only: query.major_changes_only,
            limit: Some(query.limit),
            offset: Some(query.offset()),
            ..SnapshotFilter::for_company(company_id)
        };
        let snapshots = self
            .list_snapshots(&filter, Attachments::with_sources(PAGE_SOURCES, false))
            .await?;
        let total = self.count_snapshots(&filter).await?;

        Ok(SnapshotPage {
            snapshots,
            pagination: Pagination::new(query.page, query.limit, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{day, make_company, make_milestone, make_snapshot, test_service};
    use epoch_core::enums::{EntryKind, SourceType};
    use epoch_core::query::DateRange;
    use epoch_core::requests::{NewCommentary, NewSource};
    use pretty_assertions::assert_eq;

    async fn seeded() -> (EpochService, String) {
        let svc = test_service().await;
        let apple = make_company(&svc, "Apple").await;
        for (y, major) in [(2000, true), (2002, false), (2004, false), (2007, true), (2010, false)] {
            make_snapshot(&svc, &apple.id, day(y, 6, 1), major).await;
        }
        make_milestone(&svc, &apple.id, day(2001, 1, 1), "m2001").await;
        make_milestone(&svc, &apple.id, day(2007, 1, 9), "m2007").await;
        (svc, apple.id)
    }

    #[tokio::test]
    async fn timeline_merges_in_date_order() {
        let (svc, company_id) = seeded().await;
        let data = svc
            .get_timeline(&company_id, &TimelineQuery::default())
            .await
            .unwrap();

        assert_eq!(data.total_snapshots, 5);
        assert_eq!(data.total_milestones, 2);
        assert_eq!(data.timeline.len(), 7);
        assert!(data.timeline.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(data.timeline[1].kind, EntryKind::Milestone);
    }

    #[tokio::test]
    async fn timeline_range_is_inclusive() {
        let (svc, company_id) = seeded().await;
        let query = TimelineQuery {
            range: DateRange {
                start: Some(day(2002, 6, 1)),
                end: Some(day(2007, 6, 1)),
            },
            ..TimelineQuery::default()
        };
        let data = svc.get_timeline(&company_id, &query).await.unwrap();
        let dates: Vec<_> = data.snapshots.iter().map(|s| s.snapshot_date).collect();
        assert_eq!(dates, vec![day(2002, 6, 1), day(2004, 6, 1), day(2007, 6, 1)]);
        let titles: Vec<_> = data.milestones.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["m2007"]);
    }

    #[tokio::test]
    async fn timeline_limit_takes_earliest_snapshots_only() {
        let (svc, company_id) = seeded().await;
        let query = TimelineQuery {
            limit: 2,
            ..TimelineQuery::default()
        };
        let data = svc.get_timeline(&company_id, &query).await.unwrap();
        let dates: Vec<_> = data.snapshots.iter().map(|s| s.snapshot_date).collect();
        assert_eq!(dates, vec![day(2000, 6, 1), day(2002, 6, 1)]);
        assert_eq!(data.milestones.len(), 2);
    }

    #[tokio::test]
    async fn timeline_embeds_three_newest_sources() {
        let svc = test_service().await;
        let apple = make_company(&svc, "Apple").await;
        let snapshot = make_snapshot(&svc, &apple.id, day(2007, 1, 9), true).await;
        for y in 2001..=2005 {
            svc.create_source(
                &snapshot.id,
                &NewSource {
                    source_type: SourceType::Blog,
                    title: y.to_string(),
                    url: format!("https://blog.example/{y}"),
                    publisher: None,
                    publish_date: Some(day(y, 1, 1)),
                    excerpt: None,
                },
            )
            .await
            .unwrap();
        }
        svc.create_commentary(&snapshot.id, &NewCommentary::default())
            .await
            .unwrap();

        let data = svc
            .get_timeline(&apple.id, &TimelineQuery::default())
            .await
            .unwrap();
        let titles: Vec<_> = data.snapshots[0].sources.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["2005", "2004", "2003"]);
        assert_eq!(data.snapshots[0].commentary.len(), 1);
    }

    #[tokio::test]
    async fn timeline_for_unknown_company_is_empty() {
        let svc = test_service().await;
        let data = svc
            .get_timeline("cmp-missing", &TimelineQuery::default())
            .await
            .unwrap();
        assert!(data.timeline.is_empty());
        assert_eq!(data.total_snapshots, 0);
    }

    #[tokio::test]
    async fn pages_split_and_count() {
        let (svc, company_id) = seeded().await;
        let query = SnapshotPageQuery {
            page: 2,
            limit: 2,
            ..SnapshotPageQuery::default()
        };
        let page = svc.list_snapshot_page(&company_id, &query).await.unwrap();
        let dates: Vec<_> = page.snapshots.iter().map(|s| s.snapshot_date).collect();
        assert_eq!(dates, vec![day(2004, 6, 1), day(2007, 6, 1)]);
        assert_eq!(page.pagination, Pagination::new(2, 2, 5));
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_total() {
        let (svc, company_id) = seeded().await;
        let query = SnapshotPageQuery {
            page: 9,
            limit: 2,
            ..SnapshotPageQuery::default()
        };
        let page = svc.list_snapshot_page(&company_id, &query).await.unwrap();
        assert!(page.snapshots.is_empty());
        assert_eq!(page.pagination.total, 5);
    }

    #[tokio::test]
    async fn major_changes_only_filters_page_and_total() {
        let (svc, company_id) = seeded().await;
        let query = SnapshotPageQuery {
            major_changes_only: true,
            ..SnapshotPageQuery::default()
        };
        let page = svc.list_snapshot_page(&company_id, &query).await.unwrap();
        assert_eq!(page.snapshots.len(), 2);
        assert!(page.snapshots.iter().all(|s| s.is_major_change));
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 1);
    }
}
