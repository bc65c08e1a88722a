/// Account endpoints: login, profile and liveness check
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Utc;
use jwt_security::IdentityClaims;
use serde_json::{json, Value};

use super::{response::ApiResponse, AppState};
use crate::error::{AuthError, Result};
use crate::models::{Credential, LoginResponse, UserProfile};

/// POST /api/account/login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Credential>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    // The rejection text can quote the body, so only its kind is logged
    let Json(credential) = payload.map_err(|rejection| {
        tracing::info!(status = %rejection.status(), "Rejected login body");
        AuthError::BadRequest("Expected a JSON body with username and password".to_string())
    })?;

    let response = state.auth.login(credential).await?;
    Ok(Json(ApiResponse::success(response, "Login successful")))
}

/// GET /api/account/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<IdentityClaims>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    let profile = state.auth.get_profile(&claims.name).await?;
    Ok(Json(ApiResponse::success(profile, "Profile retrieved successfully")))
}

/// GET /api/account/test
pub async fn test(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(
        json!({
            "status": "running",
            "environment": state.environment.as_str(),
            "timestamp": Utc::now(),
        }),
        "API is working",
    ))
}
