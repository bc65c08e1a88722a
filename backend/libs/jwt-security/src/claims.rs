//! Identity model shared by credential verification and token issuance

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimal identity produced by a successful credential check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub id: i32,
    pub username: String,
}

impl VerifiedIdentity {
    pub fn new(id: i32, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Claims embedded in every signed token
///
/// Field order is the serialization order of the payload segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (username)
    pub sub: String,
    /// Unique token identifier, reserved for replay bookkeeping
    pub jti: String,
    /// Numeric user id
    #[serde(rename = "userId", deserialize_with = "user_id_format::deserialize")]
    pub user_id: i32,
    /// Display name claim (username)
    pub name: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl IdentityClaims {
    /// Identity carried by these claims
    pub fn identity(&self) -> VerifiedIdentity {
        VerifiedIdentity::new(self.user_id, self.sub.clone())
    }
}

/// Compact-serialized, HMAC-SHA256 signed token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedToken(String);

impl SignedToken {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Bearer tokens are credentials too; keep them out of debug logs.
impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignedToken(***)")
    }
}

/// `userId` is written as a JSON number but tokens minted by older
/// deployments carry it as a numeric string; both decode.
mod user_id_format {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i32),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i32, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(id) => Ok(id),
            NumberOrString::Text(text) => text.trim().parse().map_err(de::Error::custom),
        }
    }
}
