// ============================
// crates/backend-lib/src/auth/csrf.rs
// ============================
//! CSRF double-submit tokens.
//!
//! A per-browser secret lives in an HTTP-only cookie, set on first contact
//! with the token endpoint and independent of the authentication cookie.
//! The token handed to the client is `salt.digest(salt, secret)`; a
//! state-changing request must echo it in a header, and validation
//! recomputes the digest against the secret presented in the cookie. A
//! token minted for one secret fails under any other secret, a missing
//! cookie, or a rotated secret.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// 32 bytes = 256 bits of entropy for the cookie-backed secret.
const SECRET_BYTES: usize = 32;
const SALT_BYTES: usize = 8;

/// Generate a new cookie-backed CSRF secret.
pub fn new_secret() -> String {
    random_token(SECRET_BYTES)
}

/// Issue a CSRF token bound to `secret`.
pub fn issue_token(secret: &str) -> String {
    let salt = random_token(SALT_BYTES);
    let mac = digest(&salt, secret);
    format!("{salt}.{mac}")
}

/// Validate a presented token against the caller's cookie secret.
pub fn validate_token(token: &str, secret: &str) -> bool {
    let Some((salt, mac)) = token.split_once('.') else {
        return false;
    };
    let expected = digest(salt, secret);
    // Both sides are base64 of a fixed-length sha256 output.
    constant_time_eq(mac.as_bytes(), expected.as_bytes())
}

fn digest(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b".");
    hasher.update(secret.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

fn random_token(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
