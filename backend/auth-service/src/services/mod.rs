/// Business logic services
pub mod auth;
pub mod credentials;

pub use auth::AuthService;
pub use credentials::CredentialVerifier;
