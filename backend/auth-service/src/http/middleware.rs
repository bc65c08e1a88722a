/// Bearer token authentication
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use super::AppState;
use crate::error::AuthError;

/// Reject requests without a valid bearer token
///
/// The scheme name is matched case-insensitively; any other scheme is
/// treated as a missing token.
///
/// On success the token's `IdentityClaims` are inserted into the request
/// extensions for handlers to pick up with `Extension<IdentityClaims>`.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = state.issuer.verify_token(token, Utc::now())?;

    tracing::debug!(user_id = claims.user_id, username = %claims.sub, "Bearer token accepted");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
