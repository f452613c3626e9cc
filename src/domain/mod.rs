//! Domain layer: client metadata, lookup results, and the backend contract.
//!
//! # Modules
//!
//! - [`client_metadata`] - Typed view of the client headers relevant to click tracking
//! - [`lookup`] - Backend replies and successful resolutions
//! - [`backend`] - [`backend::RedirectBackend`] trait implemented by the infrastructure layer
//!
//! # Redirect Flow
//!
//! 1. HTTP handler builds a [`client_metadata::ClientMetadata`] from request headers
//! 2. [`crate::application::services::RedirectService`] derives the outbound headers
//! 3. A [`backend::RedirectBackend`] performs the single lookup call
//! 4. The service classifies the [`lookup::BackendResponse`] into a redirect or an error

pub mod backend;
pub mod client_metadata;
pub mod lookup;

pub use backend::{BackendError, RedirectBackend};
pub use client_metadata::ClientMetadata;
pub use lookup::{BackendResponse, Resolution};

#[cfg(test)]
pub use backend::MockRedirectBackend;
