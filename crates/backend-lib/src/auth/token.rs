// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed, time-limited session tokens.
//!
//! Tokens are stateless HS256 JWTs carrying `{sub, iat, exp}`; validity is
//! purely a function of signature and expiry, so there is no server-side
//! session table and no revocation list. Logout only clears the client
//! cookie; a copied token stays valid until its natural expiry.

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, get_current_timestamp, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Why a token was rejected. `Expired` and `Invalid` are distinguished
/// internally only; handlers collapse both into a generic 401.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Account id
    sub: String,
    /// Issued-at, seconds since epoch
    iat: u64,
    /// Expiry, seconds since epoch
    exp: u64,
}

/// Issues and verifies session tokens with a server-held symmetric secret
/// loaded once at startup (no rotation support).
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::default();
        // A token must die exactly at `exp`, not 60 seconds later.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            validation,
        }
    }

    /// Issue a token for `user_id`, expiring `ttl` from now.
    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        let now = get_current_timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry; returns the user id on success.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;
        Ok(data.claims.sub)
    }
}
