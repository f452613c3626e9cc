//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /r/{code}` - Short link redirect via the backend
//! - `GET  /r`        - Missing code (400)
//! - `GET  /health`   - Health check: backend reachability
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Optional per-IP token bucket on redirect routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit::RateLimitLayer, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - optional limiter applied to redirect routes only; it reads
///   the client IP from forwarding headers or connect info
pub fn app_router(state: AppState, rate_limit: Option<RateLimitLayer>) -> NormalizePath<Router> {
    let mut redirect_router = api::routes::redirect_routes();
    if let Some(limiter) = rate_limit {
        redirect_router = redirect_router.layer(limiter);
    }

    let router = Router::new()
        .merge(redirect_router)
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
