//! Source repository.

use chrono::Utc;

use epoch_core::entities::Source;
use epoch_core::ids::PREFIX_SOURCE;
use epoch_core::requests::NewSource;

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime,
};
use crate::service::EpochService;

const SELECT_COLS: &str =
    "id, snapshot_id, type, title, url, publisher, publish_date, excerpt, created_at";

fn row_to_source(row: &libsql::Row) -> Result<Source, DatabaseError> {
    Ok(Source {
        id: row.get(0)?,
        snapshot_id: row.get(1)?,
        source_type: parse_enum(&row.get::<String>(2)?)?,
        title: row.get(3)?,
        url: row.get(4)?,
        publisher: get_opt_string(row, 5)?,
        publish_date: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        excerpt: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl EpochService {
    /// Attach a source to an existing snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the snapshot does not exist, or
    /// `DatabaseError::Core` if the title or URL is blank.
    pub async fn create_source(
        &self,
        snapshot_id: &str,
        input: &NewSource,
    ) -> Result<Source, DatabaseError> {
        input.validate()?;
        self.get_snapshot(snapshot_id).await?;
        let id = self.db().generate_id(PREFIX_SOURCE).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO sources ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
                libsql::params![
                    id.as_str(),
                    snapshot_id,
                    input.source_type.as_str(),
                    input.title.as_str(),
                    input.url.as_str(),
                    input.publisher.as_deref(),
                    input.publish_date.map(format_datetime),
                    input.excerpt.as_deref(),
                    format_datetime(Utc::now())
                ],
            )
            .await?;

        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM sources WHERE id = ?1"), [id.as_str()])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_source(&row)
    }

    /// Sources of a snapshot, newest publish date first (undated last).
    /// `limit` of `None` returns all of them.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_sources(
        &self,
        snapshot_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Source>, DatabaseError> {
        let limit_clause = limit.map(|n| format!("LIMIT {n}")).unwrap_or_default();
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM sources WHERE snapshot_id = ?1 \
                     ORDER BY publish_date IS NULL, publish_date DESC, created_at DESC {limit_clause}"
                ),
                [snapshot_id],
            )
            .await?;

        let mut sources = Vec::new();
        while let Some(row) = rows.next().await? {
            sources.push(row_to_source(&row)?);
        }
        Ok(sources)
    }
}
