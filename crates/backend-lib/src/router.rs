// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Route table and middleware layers.

use crate::{handlers, AppState};
use anyhow::Context;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router. CORS is restricted to the single trusted
/// origin with credentials allowed, since every authenticated call carries
/// cookies cross-origin.
pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let origin: HeaderValue = state
        .settings
        .cors_origin
        .parse()
        .with_context(|| format!("invalid cors_origin {:?}", state.settings.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(handlers::CSRF_HEADER),
        ]);

    Ok(Router::new()
        .route("/csrf-token", get(handlers::csrf_token))
        .route("/check-auth", get(handlers::check_auth))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/protected", get(handlers::protected))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
