//! # UTM Redirect
//!
//! Public short-link endpoint for a UTM link backend, built with Axum.
//!
//! `GET /r/{code}` forwards the lookup to the backend with the client's user
//! agent, referer and IP attached, then answers with a `302` to whatever
//! `Location` the backend resolved. The backend owns links, UTM parameters
//! and click analytics; this service holds no state of its own.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Client metadata, lookup results, backend trait
//! - **Application Layer** ([`application`]) - Redirect resolution service
//! - **Infrastructure Layer** ([`infrastructure`]) - `reqwest` backend client
//! - **API Layer** ([`api`]) - Handlers, DTOs, and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export BACKEND_SERVER_URL="http://localhost:3001"
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.
//!
//! ## Metrics
//!
//! Each resolution increments `redirect_outcomes_total{outcome}` through the
//! [`metrics`] facade. The crate installs no recorder: counters are dropped
//! unless the embedding binary installs one with `metrics::set_global_recorder`.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::RedirectService;
    pub use crate::domain::{
        BackendError, BackendResponse, ClientMetadata, RedirectBackend, Resolution,
    };
    pub use crate::error::AppError;
    pub use crate::infrastructure::backend::HttpRedirectBackend;
    pub use crate::state::AppState;
}
