/// Password verification against stored bcrypt hashes
use crate::error::{AuthError, Result};
use once_cell::sync::Lazy;
use std::borrow::Cow;

const BCRYPT_2A_PREFIX: &str = "$2a$";
const BCRYPT_2B_PREFIX: &str = "$2b$";

/// Stand-in hash checked when the username is unknown, so a miss pays the
/// same bcrypt cost as a wrong password
static UNKNOWN_USER_HASH: Lazy<Option<String>> =
    Lazy::new(|| bcrypt::hash("unknown-user-placeholder", bcrypt::DEFAULT_COST).ok());

/// Rewrite a `$2b$` hash to `$2a$`
///
/// Both identifiers name the same algorithm for passwords under 72 bytes.
/// Only the four prefix bytes change; cost, salt and digest are kept
/// verbatim. Any other input is returned unchanged.
pub fn normalize_bcrypt_prefix(hash: &str) -> Cow<'_, str> {
    match hash.strip_prefix(BCRYPT_2B_PREFIX) {
        Some(rest) => Cow::Owned(format!("{BCRYPT_2A_PREFIX}{rest}")),
        None => Cow::Borrowed(hash),
    }
}

/// Verify a password against a stored bcrypt hash
///
/// ## Returns
///
/// `Ok(true)` on match, `Ok(false)` on mismatch.
///
/// ## Errors
///
/// `AuthError::Internal` if the stored hash cannot be processed (malformed,
/// unsupported cost). The bcrypt error is not carried along because its
/// message can echo the hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let normalized = normalize_bcrypt_prefix(password_hash);

    bcrypt::verify(password, &normalized)
        .map_err(|_| AuthError::Internal("Stored password hash could not be processed".to_string()))
}

/// Run a bcrypt comparison whose result is thrown away
///
/// Returns whether the comparison actually ran.
pub fn verify_unknown_user(password: &str) -> bool {
    match UNKNOWN_USER_HASH.as_deref() {
        Some(hash) => {
            let _ = verify_password(password, hash);
            true
        }
        None => false,
    }
}
