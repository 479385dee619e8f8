//! Commentary repository: create, list, partial update.

use chrono::Utc;

use epoch_core::entities::Commentary;
use epoch_core::ids::PREFIX_COMMENTARY;
use epoch_core::json_list::to_json_list;
use epoch_core::requests::NewCommentary;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime};
use crate::service::EpochService;
use crate::updates::commentary::CommentaryUpdate;

const SELECT_COLS: &str = "id, snapshot_id, commentary_text, design_notes, business_context, \
     tags, created_at, updated_at";

fn row_to_commentary(row: &libsql::Row) -> Result<Commentary, DatabaseError> {
    Ok(Commentary {
        id: row.get(0)?,
        snapshot_id: row.get(1)?,
        commentary_text: get_opt_string(row, 2)?,
        design_notes: get_opt_string(row, 3)?,
        business_context: get_opt_string(row, 4)?,
        tags: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl EpochService {
    /// Attach commentary to an existing snapshot. Tags are stored as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the snapshot does not exist.
    pub async fn create_commentary(
        &self,
        snapshot_id: &str,
        input: &NewCommentary,
    ) -> Result<Commentary, DatabaseError> {
        self.get_snapshot(snapshot_id).await?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COMMENTARY).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO commentary ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                libsql::params![
                    id.as_str(),
                    snapshot_id,
                    input.commentary_text.as_deref(),
                    input.design_notes.as_deref(),
                    input.business_context.as_deref(),
                    to_json_list(&input.tags),
                    format_datetime(now),
                    format_datetime(now)
                ],
            )
            .await?;

        self.get_commentary(snapshot_id, &id).await
    }

    /// Commentary `id` belonging to `snapshot_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if it does not exist on that snapshot.
    pub async fn get_commentary(
        &self,
        snapshot_id: &str,
        id: &str,
    ) -> Result<Commentary, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM commentary WHERE id = ?1 AND snapshot_id = ?2"),
                [id, snapshot_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_commentary(&row)
    }

    /// Commentary on a snapshot, oldest first. The first entry is the effective one.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_commentary(&self, snapshot_id: &str) -> Result<Vec<Commentary>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM commentary WHERE snapshot_id = ?1 \
                     ORDER BY created_at ASC, rowid ASC"
                ),
                [snapshot_id],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_commentary(&row)?);
        }
        Ok(entries)
    }

    /// Apply a partial update to commentary `id` on `snapshot_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the commentary does not exist on
    /// that snapshot.
    pub async fn update_commentary(
        &self,
        snapshot_id: &str,
        id: &str,
        update: CommentaryUpdate,
    ) -> Result<Commentary, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref text) = update.commentary_text {
            sets.push(format!("commentary_text = ?{idx}"));
            params.push(text.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref notes) = update.design_notes {
            sets.push(format!("design_notes = ?{idx}"));
            params.push(notes.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref context) = update.business_context {
            sets.push(format!("business_context = ?{idx}"));
            params.push(context.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref tags) = update.tags {
            sets.push(format!("tags = ?{idx}"));
            params.push(to_json_list(tags).into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_commentary(snapshot_id, id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(format_datetime(Utc::now()).into());
        idx += 1;

        params.push(id.into());
        params.push(snapshot_id.into());
        let sql = format!(
            "UPDATE commentary SET {} WHERE id = ?{idx} AND snapshot_id = ?{}",
            sets.join(", "),
            idx + 1
        );
        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        self.get_commentary(snapshot_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{day, make_company, make_snapshot, test_service};
    use crate::updates::commentary::CommentaryUpdateBuilder;
    use pretty_assertions::assert_eq;

    async fn setup() -> (EpochService, String) {
        let svc = test_service().await;
        let apple = make_company(&svc, "Apple").await;
        let snapshot = make_snapshot(&svc, &apple.id, day(2007, 1, 9), true).await;
        (svc, snapshot.id)
    }

    #[tokio::test]
    async fn create_commentary_stores_tags_as_json() {
        let (svc, snapshot_id) = setup().await;
        let commentary = svc
            .create_commentary(
                &snapshot_id,
                &NewCommentary {
                    commentary_text: Some("Mobile-first".into()),
                    design_notes: None,
                    business_context: None,
                    tags: vec!["iphone".into(), "mobile".into()],
                },
            )
            .await
            .unwrap();

        assert!(commentary.id.starts_with("cmt-"));
        assert_eq!(commentary.tags, r#"["iphone","mobile"]"#);
        assert_eq!(commentary.tag_list(), vec!["iphone", "mobile"]);
    }

    #[tokio::test]
    async fn default_tags_are_empty_array() {
        let (svc, snapshot_id) = setup().await;
        let commentary = svc
            .create_commentary(&snapshot_id, &NewCommentary::default())
            .await
            .unwrap();
        assert_eq!(commentary.tags, "[]");
    }

    #[tokio::test]
    async fn commentary_on_missing_snapshot_is_no_result() {
        let svc = test_service().await;
        let result = svc
            .create_commentary("snp-missing", &NewCommentary::default())
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn update_commentary_partial() {
        let (svc, snapshot_id) = setup().await;
        let created = svc
            .create_commentary(
                &snapshot_id,
                &NewCommentary {
                    commentary_text: Some("before".into()),
                    design_notes: Some("keep me".into()),
                    ..NewCommentary::default()
                },
            )
            .await
            .unwrap();

        let update = CommentaryUpdateBuilder::new()
            .commentary_text(Some("after".into()))
            .tags(vec!["redesign".into()])
            .build();
        let updated = svc
            .update_commentary(&snapshot_id, &created.id, update)
            .await
            .unwrap();

        assert_eq!(updated.commentary_text.as_deref(), Some("after"));
        assert_eq!(updated.design_notes.as_deref(), Some("keep me"));
        assert_eq!(updated.tag_list(), vec!["redesign"]);
    }

    #[tokio::test]
    async fn update_on_wrong_snapshot_is_no_result() {
        let (svc, snapshot_id) = setup().await;
        let created = svc
            .create_commentary(&snapshot_id, &NewCommentary::default())
            .await
            .unwrap();
        let update = CommentaryUpdateBuilder::new().design_notes(None).build();
        let result = svc.update_commentary("snp-other", &created.id, update).await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn malformed_stored_tags_read_as_empty() {
        let (svc, snapshot_id) = setup().await;
        let created = svc
            .create_commentary(&snapshot_id, &NewCommentary::default())
            .await
            .unwrap();
        svc.db()
            .conn()
            .execute(
                "UPDATE commentary SET tags = 'iphone, mobile' WHERE id = ?1",
                [created.id.as_str()],
            )
            .await
            .unwrap();

        let listed = svc.list_commentary(&snapshot_id).await.unwrap();
        assert_eq!(listed[0].tags, "iphone, mobile");
        assert!(listed[0].tag_list().is_empty());
    }
}
