/// Security module for authentication
///
/// - **password**: bcrypt verification with `$2b$`/`$2a$` prefix normalization
/// - Token issuance and validation live in the shared `jwt-security` crate
pub mod password;

pub use password::{normalize_bcrypt_prefix, verify_password, verify_unknown_user};
