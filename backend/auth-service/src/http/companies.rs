use axum::extract::{rejection::PathRejection, Path, State};
use axum::Json;

use super::{response::ApiResponse, AppState};
use crate::error::{AuthError, Result};
use crate::models::Company;

/// GET /api/company
pub async fn list_companies(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Company>>>> {
    let companies = state.companies.list().await?;
    let message = format!("Retrieved {} companies", companies.len());
    Ok(Json(ApiResponse::success(companies, message)))
}

/// GET /api/company/{id}
pub async fn get_company(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Company>>> {
    let Path(id) = id.map_err(|rejection| {
        tracing::info!(status = %rejection.status(), "Rejected company id");
        AuthError::BadRequest("Company id must be an integer".to_string())
    })?;

    let company = state
        .companies
        .find_by_id(id)
        .await?
        .ok_or(AuthError::CompanyNotFound)?;

    Ok(Json(ApiResponse::success(company, "Company retrieved successfully")))
}
