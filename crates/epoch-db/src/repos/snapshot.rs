//! Snapshot repository: create, detail, filtered listings with attachments.

use chrono::Utc;

use epoch_core::entities::Snapshot;
use epoch_core::ids::PREFIX_SNAPSHOT;
use epoch_core::requests::NewSnapshot;

use crate::error::DatabaseError;
use crate::filters::SnapshotFilter;
use crate::helpers::{format_datetime, get_bool, get_opt_string, parse_datetime};
use crate::service::EpochService;

pub(crate) const SELECT_COLS: &str = "id, company_id, snapshot_date, wayback_url, screenshot_url, \
     thumbnail_url, is_major_change, created_at";

pub(crate) fn row_to_snapshot(row: &libsql::Row) -> Result<Snapshot, DatabaseError> {
    Ok(Snapshot {
        id: row.get(0)?,
        company_id: row.get(1)?,
        snapshot_date: parse_datetime(&row.get::<String>(2)?)?,
        wayback_url: get_opt_string(row, 3)?,
        screenshot_url: get_opt_string(row, 4)?,
        thumbnail_url: get_opt_string(row, 5)?,
        is_major_change: get_bool(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        company: None,
        sources: Vec::new(),
        commentary: Vec::new(),
        design_analysis: Vec::new(),
    })
}

/// Which attachments a listing loads for each snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachments {
    /// `None` loads no sources; `Some(None)` loads all; `Some(Some(n))` the newest `n`.
    pub sources: Option<Option<u32>>,
    pub commentary: bool,
    pub design_analysis: bool,
}

impl Attachments {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            sources: None,
            commentary: false,
            design_analysis: false,
        }
    }

    #[must_use]
    pub const fn full() -> Self {
        Self {
            sources: Some(None),
            commentary: true,
            design_analysis: true,
        }
    }

    /// Newest `n` sources, plus commentary and design analysis as requested.
    #[must_use]
    pub const fn with_sources(n: u32, design_analysis: bool) -> Self {
        Self {
            sources: Some(Some(n)),
            commentary: true,
            design_analysis,
        }
    }
}

impl EpochService {
    /// Insert a snapshot. The owning company is embedded in the result.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the company does not exist.
    pub async fn create_snapshot(&self, input: &NewSnapshot) -> Result<Snapshot, DatabaseError> {
        let company = self.get_company(&input.company_id).await?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SNAPSHOT).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO snapshots ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                libsql::params![
                    id.as_str(),
                    input.company_id.as_str(),
                    format_datetime(input.snapshot_date),
                    input.wayback_url.as_deref(),
                    input.screenshot_url.as_deref(),
                    input.thumbnail_url.as_deref(),
                    i64::from(input.is_major_change),
                    format_datetime(now)
                ],
            )
            .await?;

        tracing::debug!(%id, company_id = %input.company_id, "snapshot created");
        let mut snapshot = self.get_snapshot(&id).await?;
        snapshot.company = Some(company);
        Ok(snapshot)
    }

    /// Bare snapshot row without attachments.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no snapshot has this id.
    pub async fn get_snapshot(&self, id: &str) -> Result<Snapshot, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM snapshots WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_snapshot(&row)
    }

    /// Snapshot with its company, every source (newest first), commentary and
    /// design analysis.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no snapshot has this id.
    pub async fn get_snapshot_detail(&self, id: &str) -> Result<Snapshot, DatabaseError> {
        let mut snapshot = self.get_snapshot(id).await?;
        snapshot.company = Some(self.get_company(&snapshot.company_id).await?);
        self.attach(&mut snapshot, Attachments::full()).await?;
        Ok(snapshot)
    }

    /// Snapshots matching `filter`, date-ascending, with the requested attachments.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn list_snapshots(
        &self,
        filter: &SnapshotFilter,
        attachments: Attachments,
    ) -> Result<Vec<Snapshot>, DatabaseError> {
        let clause = filter.where_clause();
        let sql = format!(
            "SELECT {SELECT_COLS} FROM snapshots {} ORDER BY snapshot_date ASC, created_at ASC, id ASC {}",
            clause.sql,
            filter.page_clause()
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(clause.params))
            .await?;

        let mut snapshots = Vec::new();
        while let Some(row) = rows.next().await? {
            snapshots.push(row_to_snapshot(&row)?);
        }
        for snapshot in &mut snapshots {
            self.attach(snapshot, attachments).await?;
        }
        Ok(snapshots)
    }

    /// Number of snapshots matching `filter`, ignoring its limit and offset.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_snapshots(&self, filter: &SnapshotFilter) -> Result<u32, DatabaseError> {
        let clause = filter.where_clause();
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT COUNT(*) FROM snapshots {}", clause.sql),
                libsql::params_from_iter(clause.params),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(u32::try_from(row.get::<i64>(0)?).unwrap_or(u32::MAX))
    }

    async fn attach(
        &self,
        snapshot: &mut Snapshot,
        attachments: Attachments,
    ) -> Result<(), DatabaseError> {
        if let Some(limit) = attachments.sources {
            snapshot.sources = self.list_sources(&snapshot.id, limit).await?;
        }
        if attachments.commentary {
            snapshot.commentary = self.list_commentary(&snapshot.id).await?;
        }
        if attachments.design_analysis {
            snapshot.design_analysis = self.list_design_analysis(&snapshot.id).await?;
        }
        Ok(())
    }
}
