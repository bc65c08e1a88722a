//! Configuration management for auth-service
//!
//! Loads settings from environment variables, with a `.env` file picked up
//! in debug builds for local development.
//!
//! # Example
//!
//! ```no_run
//! use auth_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("JWT issuer: {}", settings.jwt.issuer);
//!     Ok(())
//! }
//! ```

use anyhow::{bail, ensure, Context, Result};
use chrono::TimeDelta;
use jwt_security::config::{MAX_CLOCK_SKEW_MINUTES, MAX_TOKEN_LIFETIME_MINUTES};
use jwt_security::{validate_secret_strength, SecretStrength, TokenConfig, PLACEHOLDER_SECRET};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Deployment environment, from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Staging and production refuse to run on a weak signing secret
    pub fn is_production_like(&self) -> bool {
        matches!(self, Environment::Staging | Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!("unknown environment '{other}'"),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub jwt: JwtSettings,
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load `.env` (debug builds only), then read the environment
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Ok(Settings {
            environment: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<Environment>()
                .context("Invalid APP_ENV")?,
            jwt: JwtSettings::from_env()?,
            database: DatabaseSettings::from_env()?,
            server: ServerSettings::from_env()?,
        })
    }

    /// Warn about a placeholder or weak signing secret; refuse it outright
    /// in staging and production
    pub fn enforce_secret_policy(&self) -> Result<()> {
        let token_config = self.jwt.to_token_config()?;
        let strength = validate_secret_strength(&token_config.secret);
        let placeholder = token_config.uses_placeholder_secret();

        if !placeholder && strength != SecretStrength::Weak {
            info!(strength = ?strength, "JWT secret accepted");
            return Ok(());
        }

        if self.environment.is_production_like() {
            bail!(
                "JWT_SECRET is {} and may not be used in {}",
                if placeholder { "the placeholder default" } else { "too weak" },
                self.environment
            );
        }

        warn!(
            environment = %self.environment,
            placeholder,
            "JWT secret is weak; set a strong JWT_SECRET before deploying"
        );
        Ok(())
    }
}

/// JWT signing settings
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_minutes: i64,
    pub clock_skew_minutes: i64,
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        let settings = Self {
            secret: env::var("JWT_SECRET").unwrap_or_else(|_| PLACEHOLDER_SECRET.to_string()),
            issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| jwt_security::config::DEFAULT_ISSUER.to_string()),
            audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| jwt_security::config::DEFAULT_AUDIENCE.to_string()),
            expiry_minutes: parse_env(
                "JWT_EXPIRY_MINUTES",
                &jwt_security::config::DEFAULT_TOKEN_LIFETIME_MINUTES.to_string(),
            )?,
            clock_skew_minutes: parse_env(
                "JWT_CLOCK_SKEW_MINUTES",
                &jwt_security::config::DEFAULT_CLOCK_SKEW_MINUTES.to_string(),
            )?,
        };

        ensure!(!settings.secret.is_empty(), "JWT_SECRET must not be empty");
        ensure!(
            (1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&settings.expiry_minutes),
            "JWT_EXPIRY_MINUTES must be between 1 and {MAX_TOKEN_LIFETIME_MINUTES}"
        );
        ensure!(
            (0..=MAX_CLOCK_SKEW_MINUTES).contains(&settings.clock_skew_minutes),
            "JWT_CLOCK_SKEW_MINUTES must be between 0 and {MAX_CLOCK_SKEW_MINUTES}"
        );

        Ok(settings)
    }

    pub fn to_token_config(&self) -> Result<TokenConfig> {
        let lifetime = TimeDelta::try_minutes(self.expiry_minutes)
            .context("JWT_EXPIRY_MINUTES is out of range")?;
        let clock_skew = TimeDelta::try_minutes(self.clock_skew_minutes)
            .context("JWT_CLOCK_SKEW_MINUTES is out of range")?;

        Ok(TokenConfig::new(self.secret.clone())
            .with_issuer(self.issuer.clone())
            .with_audience(self.audience.clone())
            .with_lifetime(lifetime)
            .with_clock_skew(clock_skew))
    }
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"***")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiry_minutes", &self.expiry_minutes)
            .field("clock_skew_minutes", &self.clock_skew_minutes)
            .finish()
    }
}

/// Database connection settings
///
/// Without `DATABASE_URL` the service runs on in-memory stores, seeded from
/// `SEED_USERS_FILE` when given.
#[derive(Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: u64,
    pub seed_file: Option<PathBuf>,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", "10")?,
            acquire_timeout: parse_env("DATABASE_ACQUIRE_TIMEOUT", "5")?,
            seed_file: env::var("SEED_USERS_FILE").ok().map(PathBuf::from),
        })
    }
}

// DATABASE_URL carries credentials
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url.as_ref().map(|_| "***"))
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("seed_file", &self.seed_file)
            .finish()
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("SERVER_PORT", "8080")?,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", "30")?,
        })
    }
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .with_context(|| format!("Invalid {key}"))
}
