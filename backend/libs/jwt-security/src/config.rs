//! Token issuance/validation settings
//!
//! Built once at startup and shared read-only by every request.

use chrono::Duration;
use std::fmt;

/// Fallback secret used when no `JWT_SECRET` is configured.
///
/// Public knowledge; tokens signed with it can be forged by anyone.
pub const PLACEHOLDER_SECRET: &str = "YourSuperSecretKeyForJWTTokenGeneration12345678";
pub const DEFAULT_ISSUER: &str = "AuthApi";
pub const DEFAULT_AUDIENCE: &str = "AuthApiUsers";
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 60;
pub const DEFAULT_CLOCK_SKEW_MINUTES: i64 = 5;
/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 525_600;
pub const MAX_CLOCK_SKEW_MINUTES: i64 = 60;

#[derive(Clone)]
pub struct TokenConfig {
    /// Shared HMAC-SHA256 secret
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Time between issuance and `exp`
    pub lifetime: Duration,
    /// Tolerance added to `exp` when validating
    pub clock_skew: Duration,
}

impl TokenConfig {
    /// Config with the given secret and default issuer, audience, lifetime and skew
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            lifetime: Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES),
            clock_skew: Duration::minutes(DEFAULT_CLOCK_SKEW_MINUTES),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_clock_skew(mut self, clock_skew: Duration) -> Self {
        self.clock_skew = clock_skew;
        self
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret == PLACEHOLDER_SECRET
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new(PLACEHOLDER_SECRET)
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"***")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime_minutes", &self.lifetime.num_minutes())
            .field("clock_skew_minutes", &self.clock_skew.num_minutes())
            .finish()
    }
}
