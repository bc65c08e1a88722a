use std::sync::Arc;

use jwt_security::VerifiedIdentity;
use tokio::task;

use crate::db::UserStore;
use crate::error::{AuthError, Result};
use crate::security::{verify_password, verify_unknown_user};

/// Checks a username/password pair against the user store
///
/// Unknown user, wrong password and an unusable stored hash all come back as
/// [`AuthError::InvalidCredentials`]. Store failures propagate unchanged.
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn verify(&self, username: &str, password: &str) -> Result<VerifiedIdentity> {
        if username.is_empty() {
            tracing::info!("Login rejected: empty username");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(username = %username, "Verifying credentials");

        let Some(user) = self.users.find_by_username(username).await? else {
            // Same bcrypt work as a wrong password, so timing does not reveal the miss
            let password = password.to_owned();
            if let Err(join_err) =
                task::spawn_blocking(move || verify_unknown_user(&password)).await
            {
                tracing::error!(error = %join_err, "Password check task failed");
            }
            tracing::info!(username = %username, "Login failed: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        let user_id = user.id;
        let password = password.to_owned();
        let password_hash = user.password_hash;

        // bcrypt is CPU-bound
        let verdict =
            task::spawn_blocking(move || verify_password(&password, &password_hash)).await;

        match verdict {
            Ok(Ok(true)) => {
                tracing::info!(username = %username, user_id, "Credentials verified");
                Ok(VerifiedIdentity::new(user_id, user.username))
            }
            Ok(Ok(false)) => {
                tracing::info!(username = %username, user_id, "Login failed: password mismatch");
                Err(AuthError::InvalidCredentials)
            }
            Ok(Err(_)) => {
                tracing::warn!(username = %username, user_id, "Login failed: stored hash unusable");
                Err(AuthError::InvalidCredentials)
            }
            Err(join_err) => {
                tracing::error!(username = %username, user_id, error = %join_err, "Password check task failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
