pub(crate) mod companies;
pub(crate) mod snapshots;
pub(crate) mod timeline;

use axum::Json;
use chrono::Utc;
use epoch_core::responses::HealthResponse;

use crate::error::ApiError;

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok(Utc::now()))
}

pub(crate) async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
