// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
    Params, Scrypt,
};

/// scrypt cost (log2 N). 2^15 with r=8 keeps a login in the tens of
/// milliseconds while staying memory-hard; the parameters are recorded in
/// the PHC string, so this can be raised without invalidating old hashes.
const DEFAULT_LOG_N: u8 = 15;
const DEFAULT_R: u32 = 8;
const DEFAULT_P: u32 = 1;

/// Hash a password using scrypt with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    hash_password_with_cost(plain, DEFAULT_LOG_N)
}

/// Hash with an explicit cost factor (used by tests and tuning).
pub fn hash_password_with_cost(plain: &str, log_n: u8) -> anyhow::Result<String> {
    let params = Params::new(log_n, DEFAULT_R, DEFAULT_P, Params::RECOMMENDED_LEN)
        .map_err(|e| anyhow::anyhow!("invalid scrypt params: {e}"))?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored PHC hash string. The comparison is
/// over the full derived key, so mismatch position does not affect timing.
/// An unparseable hash verifies as false rather than erroring.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}
