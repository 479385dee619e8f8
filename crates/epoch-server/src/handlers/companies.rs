use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use epoch_core::entities::{Company, CompanyDetail};
use epoch_core::requests::{CompanyPatch, NewCompany};
use epoch_db::updates::company::CompanyUpdate;

use crate::AppState;
use crate::error::ApiError;

pub(crate) async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let companies = state
        .service
        .list_companies()
        .await
        .map_err(ApiError::store("Failed to fetch companies"))?;
    Ok(Json(companies))
}

pub(crate) async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompanyDetail>, ApiError> {
    let detail = state
        .service
        .get_company_detail(&id)
        .await
        .map_err(ApiError::lookup("Company not found", "Failed to fetch company"))?;
    Ok(Json(detail))
}

pub(crate) async fn create_company(
    State(state): State<AppState>,
    payload: Result<Json<NewCompany>, JsonRejection>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    let Json(input) = payload?;
    let company = state
        .service
        .create_company(&input)
        .await
        .map_err(ApiError::store("Failed to create company"))?;
    tracing::info!(id = %company.id, name = %company.name, "company created");
    Ok((StatusCode::CREATED, Json(company)))
}

pub(crate) async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CompanyPatch>, JsonRejection>,
) -> Result<Json<Company>, ApiError> {
    let Json(patch) = payload?;
    patch.validate()?;
    let company = state
        .service
        .update_company(&id, CompanyUpdate::from(patch))
        .await
        .map_err(ApiError::lookup("Company not found", "Failed to update company"))?;
    Ok(Json(company))
}
