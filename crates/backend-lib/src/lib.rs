// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core library for the authentication/session backend.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod store;
pub mod validation;

use crate::auth::{RateLimiter, TokenService};
use crate::config::Settings;
use crate::store::CredentialStore;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all handlers. Each component is
/// independently synchronized; no handler holds cross-component locks.
#[derive(Clone)]
pub struct AppState {
    /// Registered accounts
    pub accounts: Arc<CredentialStore>,
    /// Session token issue/verify
    pub tokens: Arc<TokenService>,
    /// Auth-endpoint rate limiter
    pub rate_limiter: Arc<RateLimiter>,
    /// Settings loaded once at startup
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create the application state from loaded settings.
    pub fn new(settings: Settings) -> Self {
        let tokens = TokenService::new(
            &settings.jwt_secret,
            Duration::from_secs(settings.session_ttl_secs),
        );
        let rate_limiter = RateLimiter::new(
            Duration::from_secs(settings.rate_limit.window_secs),
            settings.rate_limit.max_requests,
        );

        Self {
            accounts: Arc::new(CredentialStore::new()),
            tokens: Arc::new(tokens),
            rate_limiter: Arc::new(rate_limiter),
            settings: Arc::new(settings),
        }
    }
}
