use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jwt_security::TokenError;
use thiserror::Error;

use crate::http::response::ApiResponse;

/// Message returned for every failed login, whatever the cause
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user, wrong password or unusable stored hash. Never split
    /// these apart in anything a caller can observe.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("User not found")]
    UserNotFound,

    #[error("Company not found")]
    CompanyNotFound,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound | AuthError::CompanyNotFound => StatusCode::NOT_FOUND,
            AuthError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            AuthError::BadRequest(_) => "Invalid request body",
            AuthError::MissingToken | AuthError::InvalidToken(_) => "Unauthorized",
            AuthError::UserNotFound => "User not found",
            AuthError::CompanyNotFound => "Company not found",
            // Don't leak internal details
            AuthError::StoreUnavailable(_) => "Service temporarily unavailable",
            AuthError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AuthError::BadRequest(detail) => {
                ApiResponse::<()>::error(self.public_message()).with_errors(vec![detail.clone()])
            }
            _ => ApiResponse::<()>::error(self.public_message()),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "Database error");
        AuthError::StoreUnavailable(err.to_string())
    }
}
