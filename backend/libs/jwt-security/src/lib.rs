//! JWT issuance and validation for the auth service
//!
//! **Security Features**:
//! - HS256 only: a token carrying any other `alg` is rejected before the
//!   signature is checked
//! - Issuer, audience and expiry validated on every decode
//! - Clock skew tolerance applied against an explicit `now`, so tests and
//!   callers control the clock
//! - JWT ID (jti) minted per token for future replay bookkeeping
//! - Secret strength checks for operator-supplied secrets
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use jwt_security::{TokenConfig, TokenIssuer, VerifiedIdentity};
//!
//! let issuer = TokenIssuer::new(TokenConfig::new("kX8#pQ2!vN9$wR4@zT7&mB3*hJ6^cF1%"));
//! let now = Utc::now();
//! let token = issuer.issue(&VerifiedIdentity::new(7, "alice"), now).unwrap();
//! let claims = issuer.verify_token(token.as_str(), now).unwrap();
//! assert_eq!(claims.user_id, 7);
//! ```

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, warn};
use uuid::Uuid;

pub mod claims;
pub mod config;
pub mod error;
pub mod secret_validation;

pub use claims::{IdentityClaims, SignedToken, VerifiedIdentity};
pub use config::{TokenConfig, PLACEHOLDER_SECRET};
pub use error::{Result, TokenError};
pub use secret_validation::{validate_secret_strength, SecretStrength};

/// JWT algorithm used for every token this service signs or accepts
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims a token must carry to be considered well-formed
const REQUIRED_CLAIMS: [&str; 4] = ["exp", "iss", "aud", "sub"];

/// Signs and validates bearer tokens with a shared HMAC secret
///
/// Keys and the validation policy are derived once from the config;
/// the issuer holds no mutable state and is shared behind an `Arc`.
pub struct TokenIssuer {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(JWT_ALGORITHM);
        // Expiry is checked against the caller's clock in `verify_token`
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Mint a token for a verified identity
    ///
    /// `exp` is `now + lifetime`. Fails with [`TokenError::Signing`] only when
    /// that instant is beyond the representable clock range or the library
    /// rejects the claims.
    pub fn issue(&self, identity: &VerifiedIdentity, now: DateTime<Utc>) -> Result<SignedToken> {
        let expires_at = now
            .checked_add_signed(self.config.lifetime)
            .ok_or_else(|| TokenError::Signing("token expiry is out of range".to_string()))?;

        let claims = IdentityClaims {
            sub: identity.username.clone(),
            jti: Uuid::new_v4().to_string(),
            user_id: identity.id,
            name: identity.username.clone(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        debug!(
            user_id = identity.id,
            username = %identity.username,
            jti = %claims.jti,
            exp = claims.exp,
            "Access token issued"
        );

        Ok(SignedToken::new(token))
    }

    /// Validate a presented token and recover its claims
    ///
    /// Checks run in order: structure and algorithm, signature, issuer,
    /// audience, then expiry. A token is accepted while
    /// `now < exp + clock_skew`.
    pub fn verify_token(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims> {
        let token_data =
            decode::<IdentityClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                let err = TokenError::from(e);
                warn!(error = %err, "Token validation failed");
                err
            })?;

        let claims = token_data.claims;
        let deadline = claims.exp.saturating_add(self.config.clock_skew.num_seconds());
        if now.timestamp() >= deadline {
            warn!(
                username = %claims.sub,
                exp = claims.exp,
                "Token validation failed: expired"
            );
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::{Duration, TimeZone};

    const TEST_SECRET: &str = "y9K$mP2vRx#TnZ@s4Yw!cGf7Dh&e3Xa6Wq8Lj5BtNu1Zp0MkYhVgCxFbAsSdQwEr";

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(TokenConfig::new(TEST_SECRET))
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn alice() -> VerifiedIdentity {
        VerifiedIdentity::new(7, "alice")
    }

    fn decode_segment(segment: &str) -> serde_json::Value {
        let bytes = URL_SAFE_NO_PAD.decode(segment).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = test_issuer();
        let token = issuer.issue(&alice(), fixed_now()).unwrap();

        let claims = issuer.verify_token(token.as_str(), fixed_now()).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.iss, "AuthApi");
        assert_eq!(claims.aud, "AuthApiUsers");
        assert_eq!(claims.exp, (fixed_now() + Duration::minutes(60)).timestamp());
    }

    #[test]
    fn test_wire_format_is_compact_hs256() {
        let token = test_issuer().issue(&alice(), fixed_now()).unwrap();
        let segments: Vec<&str> = token.as_str().split('.').collect();
        assert_eq!(segments.len(), 3);

        let header = decode_segment(segments[0]);
        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");

        let payload = decode_segment(segments[1]);
        assert_eq!(payload["sub"], "alice");
        assert_eq!(payload["userId"], 7);
        assert_eq!(payload["name"], "alice");
        assert_eq!(payload["iss"], "AuthApi");
        assert_eq!(payload["aud"], "AuthApiUsers");
        assert!(payload["jti"].as_str().is_some_and(|jti| !jti.is_empty()));
        assert!(payload["exp"].is_i64());
    }

    #[test]
    fn test_jti_is_unique_per_token() {
        let issuer = test_issuer();
        let first = issuer.issue(&alice(), fixed_now()).unwrap();
        let second = issuer.issue(&alice(), fixed_now()).unwrap();

        let first = issuer.verify_token(first.as_str(), fixed_now()).unwrap();
        let second = issuer.verify_token(second.as_str(), fixed_now()).unwrap();
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_expiry_respects_clock_skew() {
        let issuer = test_issuer();
        let token = issuer.issue(&alice(), fixed_now()).unwrap();
        let expiry = fixed_now() + Duration::minutes(60);

        // Inside the 5 minute allowance
        assert!(issuer
            .verify_token(token.as_str(), expiry + Duration::minutes(4))
            .is_ok());

        // Beyond it
        assert_eq!(
            issuer.verify_token(token.as_str(), expiry + Duration::minutes(6)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let issuer = test_issuer();
        let token = issuer.issue(&alice(), fixed_now()).unwrap();
        let deadline = fixed_now() + Duration::minutes(65);

        assert!(issuer
            .verify_token(token.as_str(), deadline - Duration::seconds(1))
            .is_ok());
        assert_eq!(
            issuer.verify_token(token.as_str(), deadline),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_configured_lifetime_and_skew() {
        let issuer = TokenIssuer::new(
            TokenConfig::new(TEST_SECRET)
                .with_lifetime(Duration::minutes(15))
                .with_clock_skew(Duration::zero()),
        );
        let token = issuer.issue(&alice(), fixed_now()).unwrap();

        assert!(issuer
            .verify_token(token.as_str(), fixed_now() + Duration::minutes(14))
            .is_ok());
        assert_eq!(
            issuer.verify_token(token.as_str(), fixed_now() + Duration::minutes(15)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_lifetime_past_the_clock_range_is_an_error() {
        // Roughly 270,000 years: representable as a duration, not as a date
        let issuer = TokenIssuer::new(
            TokenConfig::new(TEST_SECRET).with_lifetime(Duration::days(100_000_000)),
        );

        assert!(matches!(
            issuer.issue(&alice(), fixed_now()),
            Err(TokenError::Signing(_))
        ));
    }

    #[test]
    fn test_longest_accepted_lifetime_issues() {
        let issuer = TokenIssuer::new(
            TokenConfig::new(TEST_SECRET)
                .with_lifetime(Duration::minutes(config::MAX_TOKEN_LIFETIME_MINUTES)),
        );

        let token = issuer.issue(&alice(), fixed_now()).unwrap();
        let claims = issuer.verify_token(token.as_str(), fixed_now()).unwrap();
        assert_eq!(claims.exp, (fixed_now() + Duration::days(365)).timestamp());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let issuer = test_issuer();
        let token = issuer.issue(&alice(), fixed_now()).unwrap();
        let segments: Vec<&str> = token.as_str().split('.').collect();

        for index in 0..segments[1].len() {
            let mut payload: Vec<u8> = segments[1].as_bytes().to_vec();
            payload[index] = if payload[index] == b'A' { b'B' } else { b'A' };
            let tampered = format!(
                "{}.{}.{}",
                segments[0],
                String::from_utf8(payload).unwrap(),
                segments[2]
            );

            assert_eq!(
                issuer.verify_token(&tampered, fixed_now()),
                Err(TokenError::InvalidSignature),
                "tampering byte {} must invalidate the signature",
                index
            );
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = test_issuer().issue(&alice(), fixed_now()).unwrap();
        let other = TokenIssuer::new(TokenConfig::new("another-secret-entirely-4f9Qz!x7Lw"));

        assert_eq!(
            other.verify_token(token.as_str(), fixed_now()),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_issuer_mismatch_is_rejected() {
        let foreign = TokenIssuer::new(TokenConfig::new(TEST_SECRET).with_issuer("SomeoneElse"));
        let token = foreign.issue(&alice(), fixed_now()).unwrap();

        assert_eq!(
            test_issuer().verify_token(token.as_str(), fixed_now()),
            Err(TokenError::IssuerMismatch)
        );
    }

    #[test]
    fn test_audience_mismatch_is_rejected() {
        let foreign =
            TokenIssuer::new(TokenConfig::new(TEST_SECRET).with_audience("OtherAudience"));
        let token = foreign.issue(&alice(), fixed_now()).unwrap();

        assert_eq!(
            test_issuer().verify_token(token.as_str(), fixed_now()),
            Err(TokenError::AudienceMismatch)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let issuer = test_issuer();
        assert!(matches!(
            issuer.verify_token("not-a-token", fixed_now()),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            issuer.verify_token("", fixed_now()),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let claims = serde_json::json!({
            "sub": "alice",
            "jti": "x",
            "userId": 7,
            "name": "alice",
            "iss": "AuthApi",
            "aud": "AuthApiUsers",
            "exp": (fixed_now() + Duration::minutes(60)).timestamp(),
        });
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            test_issuer().verify_token(&token, fixed_now()),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_string_user_id_tokens_still_verify() {
        let claims = serde_json::json!({
            "sub": "alice",
            "jti": "legacy",
            "userId": "7",
            "name": "alice",
            "iss": "AuthApi",
            "aud": "AuthApiUsers",
            "exp": (fixed_now() + Duration::minutes(60)).timestamp(),
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let verified = test_issuer().verify_token(&token, fixed_now()).unwrap();
        assert_eq!(verified.identity(), alice());
    }

    #[test]
    fn test_missing_audience_is_malformed() {
        let claims = serde_json::json!({
            "sub": "alice",
            "jti": "x",
            "userId": 7,
            "name": "alice",
            "iss": "AuthApi",
            "exp": (fixed_now() + Duration::minutes(60)).timestamp(),
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            test_issuer().verify_token(&token, fixed_now()),
            Err(TokenError::Malformed(_))
        ));
    }
}
