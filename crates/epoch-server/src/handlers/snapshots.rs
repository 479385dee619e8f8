use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use epoch_core::entities::{Commentary, Snapshot, Source};
use epoch_core::requests::{CommentaryPatch, NewCommentary, NewSnapshot, NewSource};
use epoch_db::updates::commentary::CommentaryUpdate;

use crate::AppState;
use crate::error::ApiError;

pub(crate) async fn get_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Snapshot>, ApiError> {
    let snapshot = state
        .service
        .get_snapshot_detail(&id)
        .await
        .map_err(ApiError::lookup("Snapshot not found", "Failed to fetch snapshot"))?;
    Ok(Json(snapshot))
}

pub(crate) async fn create_snapshot(
    State(state): State<AppState>,
    payload: Result<Json<NewSnapshot>, JsonRejection>,
) -> Result<(StatusCode, Json<Snapshot>), ApiError> {
    let Json(input) = payload?;
    let snapshot = state
        .service
        .create_snapshot(&input)
        .await
        .map_err(ApiError::lookup("Company not found", "Failed to create snapshot"))?;
    tracing::info!(id = %snapshot.id, company_id = %snapshot.company_id, "snapshot created");
    Ok((StatusCode::CREATED, Json(snapshot)))
}

pub(crate) async fn create_source(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
    payload: Result<Json<NewSource>, JsonRejection>,
) -> Result<(StatusCode, Json<Source>), ApiError> {
    let Json(input) = payload?;
    let source = state
        .service
        .create_source(&snapshot_id, &input)
        .await
        .map_err(ApiError::lookup("Snapshot not found", "Failed to create source"))?;
    Ok((StatusCode::CREATED, Json(source)))
}

pub(crate) async fn create_commentary(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
    payload: Result<Json<NewCommentary>, JsonRejection>,
) -> Result<(StatusCode, Json<Commentary>), ApiError> {
    let Json(input) = payload?;
    let commentary = state
        .service
        .create_commentary(&snapshot_id, &input)
        .await
        .map_err(ApiError::lookup("Snapshot not found", "Failed to create commentary"))?;
    Ok((StatusCode::CREATED, Json(commentary)))
}

pub(crate) async fn update_commentary(
    State(state): State<AppState>,
    Path((snapshot_id, commentary_id)): Path<(String, String)>,
    payload: Result<Json<CommentaryPatch>, JsonRejection>,
) -> Result<Json<Commentary>, ApiError> {
    let Json(patch) = payload?;
    let commentary = state
        .service
        .update_commentary(&snapshot_id, &commentary_id, CommentaryUpdate::from(patch))
        .await
        .map_err(ApiError::lookup("Commentary not found", "Failed to update commentary"))?;
    Ok(Json(commentary))
}
