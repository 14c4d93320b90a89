//! Bearer token signing and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and a fixed 24-hour expiry.
//! Nothing is stored server-side, so a token stays valid until it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use contact_book_core::UserId;

/// Lifetime of every issued token, in hours.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Lifetime of every issued token.
#[must_use]
pub fn token_ttl() -> Duration {
    Duration::hours(TOKEN_TTL_HOURS)
}

/// Token failures.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    /// Malformed, tampered with, or expired.
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: UserId,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signing and verification keys derived from the server secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

impl TokenKeys {
    /// Derive keys from the shared secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for `user_id`, valid for [`token_ttl`] from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Sign` if encoding fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it were minted at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Sign` if encoding fails.
    pub fn issue_at(&self, user_id: UserId, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + token_ttl()).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Sign)
    }

    /// Check signature and expiry, returning the claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for anything other than a well-formed,
    /// correctly signed, unexpired token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> TokenKeys {
        TokenKeys::new(&SecretString::from(secret.to_owned()))
    }

    #[test]
    fn test_issue_then_verify() {
        let keys = keys("k3y-material-for-tests-0123456789abcdef");
        let token = keys.issue(UserId::new(7)).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.user_id, UserId::new(7));
        assert_eq!(claims.exp - claims.iat, token_ttl().num_seconds());
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = keys("k3y-material-for-tests-0123456789abcdef");
        let minted = Utc::now() - token_ttl() - Duration::seconds(5);
        let token = keys.issue_at(UserId::new(7), minted).unwrap();

        assert!(matches!(keys.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_token_nearly_expired_still_valid() {
        let keys = keys("k3y-material-for-tests-0123456789abcdef");
        let minted = Utc::now() - token_ttl() + Duration::minutes(1);
        let token = keys.issue_at(UserId::new(7), minted).unwrap();

        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = keys("first-secret-0123456789abcdefghij")
            .issue(UserId::new(1))
            .unwrap();
        let other = keys("second-secret-0123456789abcdefghi");

        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let keys = keys("k3y-material-for-tests-0123456789abcdef");
        assert!(keys.verify("").is_err());
        assert!(keys.verify("not.a.jwt").is_err());
    }

    #[test]
    fn test_claims_use_user_id_key() {
        let json = serde_json::to_value(Claims {
            user_id: UserId::new(3),
            iat: 1,
            exp: 2,
        })
        .unwrap();
        assert_eq!(json["userId"], 3);
    }
}
