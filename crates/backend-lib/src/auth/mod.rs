// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication building blocks: password hashing, session tokens,
//! CSRF double-submit tokens, and auth-endpoint rate limiting.

pub mod csrf;
pub mod password;
pub mod rate_limit;
pub mod token;

pub use password::{hash_password, verify_password};
pub use rate_limit::{RateLimiter, RouteFamily};
pub use token::{TokenError, TokenService};
