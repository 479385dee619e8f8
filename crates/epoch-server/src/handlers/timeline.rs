use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use epoch_core::pagination::SnapshotPage;
use epoch_core::query::{SnapshotPageQuery, TimelineQuery};
use epoch_core::timeline::TimelineData;

use crate::AppState;
use crate::error::ApiError;

/// `GET /api/timeline/{company_id}`. An unknown company yields an empty timeline.
pub(crate) async fn get_timeline(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TimelineData>, ApiError> {
    let query = TimelineQuery::from_params(&params, &state.query_defaults)?;
    let data = state
        .service
        .get_timeline(&company_id, &query)
        .await
        .map_err(ApiError::store("Failed to fetch timeline data"))?;
    Ok(Json(data))
}

pub(crate) async fn list_snapshots(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SnapshotPage>, ApiError> {
    let query = SnapshotPageQuery::from_params(&params, &state.query_defaults)?;
    let page = state
        .service
        .list_snapshot_page(&company_id, &query)
        .await
        .map_err(ApiError::store("Failed to fetch snapshots"))?;
    Ok(Json(page))
}
