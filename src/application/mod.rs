//! Application layer services implementing business logic.
//!
//! Services consume domain traits and provide a clean API for HTTP handlers
//! and the `probe` CLI.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Short-code resolution via the backend

pub mod services;
