//! Redirect route configuration.

use crate::api::handlers::{missing_code_handler, redirect_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Public redirect routes.
///
/// # Endpoints
///
/// - `GET /r/{code}` - Resolve a short code and redirect
/// - `GET /r`        - Missing code, always 400
pub fn redirect_routes() -> Router<AppState> {
    Router::new()
        .route("/r", get(missing_code_handler))
        .route("/r/{code}", get(redirect_handler))
}
