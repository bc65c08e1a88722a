use std::sync::Arc;

use chrono::Utc;
use jwt_security::TokenIssuer;

use super::CredentialVerifier;
use crate::db::UserStore;
use crate::error::{AuthError, Result};
use crate::models::{Credential, LoginResponse, UserProfile};

/// Login and profile operations backing the account endpoints
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    verifier: CredentialVerifier,
    issuer: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            verifier: CredentialVerifier::new(users.clone()),
            users,
            issuer,
        }
    }

    pub fn issuer(&self) -> &Arc<TokenIssuer> {
        &self.issuer
    }

    /// Verify the credential and mint a bearer token for it
    pub async fn login(&self, credential: Credential) -> Result<LoginResponse> {
        let Credential { username, password } = credential;

        let identity = self.verifier.verify(&username, &password).await?;

        let token = self.issuer.issue(&identity, Utc::now()).map_err(|e| {
            tracing::error!(user_id = identity.id, error = %e, "Failed to sign token");
            AuthError::Internal("Failed to sign token".to_string())
        })?;

        tracing::info!(user_id = identity.id, username = %identity.username, "User logged in");

        Ok(LoginResponse {
            token: token.into_string(),
            username: identity.username,
        })
    }

    /// Profile of the user named in a verified token
    pub async fn get_profile(&self, username: &str) -> Result<UserProfile> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserProfile::from(user))
    }
}
