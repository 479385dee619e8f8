//! Design analysis repository.

use chrono::Utc;

use epoch_core::entities::DesignAnalysis;
use epoch_core::ids::PREFIX_DESIGN_ANALYSIS;
use epoch_core::json_list::to_json_list;
use epoch_core::requests::NewDesignAnalysis;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_bool, get_opt_string, parse_datetime};
use crate::service::EpochService;

const SELECT_COLS: &str = "id, snapshot_id, primary_colors, fonts, layout_type, \
     has_mobile_version, page_weight_kb, created_at";

fn row_to_design_analysis(row: &libsql::Row) -> Result<DesignAnalysis, DatabaseError> {
    Ok(DesignAnalysis {
        id: row.get(0)?,
        snapshot_id: row.get(1)?,
        primary_colors: row.get(2)?,
        fonts: row.get(3)?,
        layout_type: get_opt_string(row, 4)?,
        has_mobile_version: get_opt_bool(row, 5)?,
        page_weight_kb: row.get::<Option<i64>>(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl EpochService {
    /// Attach a design analysis to an existing snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the snapshot does not exist.
    pub async fn create_design_analysis(
        &self,
        snapshot_id: &str,
        input: &NewDesignAnalysis,
    ) -> Result<DesignAnalysis, DatabaseError> {
        self.get_snapshot(snapshot_id).await?;
        let id = self.db().generate_id(PREFIX_DESIGN_ANALYSIS).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO design_analysis ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                libsql::params![
                    id.as_str(),
                    snapshot_id,
                    to_json_list(&input.primary_colors),
                    to_json_list(&input.fonts),
                    input.layout_type.as_deref(),
                    input.has_mobile_version.map(i64::from),
                    input.page_weight_kb,
                    format_datetime(Utc::now())
                ],
            )
            .await?;

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM design_analysis WHERE id = ?1"),
                [id.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_design_analysis(&row)
    }

    /// Design analyses of a snapshot, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_design_analysis(
        &self,
        snapshot_id: &str,
    ) -> Result<Vec<DesignAnalysis>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM design_analysis WHERE snapshot_id = ?1 \
                     ORDER BY created_at ASC, rowid ASC"
                ),
                [snapshot_id],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_design_analysis(&row)?);
        }
        Ok(entries)
    }
}
