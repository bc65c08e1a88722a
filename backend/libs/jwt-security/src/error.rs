use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenError>;

/// Reasons a presented token is rejected
///
/// Callers surface every variant as "unauthenticated"; the distinction
/// exists for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token issuer mismatch")]
    IssuerMismatch,

    #[error("Token audience mismatch")]
    AudienceMismatch,

    #[error("Token expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
            ErrorKind::InvalidAudience => TokenError::AudienceMismatch,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}
