// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Symmetric secret for signing session tokens. Externally supplied;
    /// startup fails if it is missing or empty.
    #[serde(default)]
    pub jwt_secret: String,
    /// The single trusted origin allowed to make credentialed requests
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Mark cookies `Secure` (enable behind TLS in production)
    #[serde(default)]
    pub secure_cookies: bool,
    /// Session token lifetime in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Minimum accepted password length
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Rate limiting for the auth endpoints
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

/// Rate limit window configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Window duration in seconds
    #[serde(default = "default_rate_window_secs")]
    pub window_secs: u64,
    /// Maximum requests per window
    #[serde(default = "default_rate_max_requests")]
    pub max_requests: u32,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3001))
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_session_ttl_secs() -> u64 {
    60 * 60 // 1 hour
}

fn default_min_password_length() -> usize {
    6
}

fn default_rate_window_secs() -> u64 {
    15 * 60 // 15 minutes
}

fn default_rate_max_requests() -> u32 {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            jwt_secret: String::new(),
            cors_origin: default_cors_origin(),
            secure_cookies: false,
            session_ttl_secs: default_session_ttl_secs(),
            min_password_length: default_min_password_length(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: default_rate_window_secs(),
            max_requests: default_rate_max_requests(),
        }
    }
}

impl Settings {
    /// Load settings from `auth.toml` and `AUTH_`-prefixed environment
    /// variables (nested keys split on `__`, e.g. `AUTH_RATE_LIMIT__MAX_REQUESTS`).
    pub fn load() -> Result<Self> {
        Self::load_from("auth.toml")
    }

    /// Load settings from an explicit config file path plus the environment.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings: Settings = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("AUTH_").split("__"))
            .extract()?;

        if settings.jwt_secret.is_empty() {
            bail!("jwt_secret must be set (AUTH_JWT_SECRET)");
        }

        Ok(settings)
    }
}
