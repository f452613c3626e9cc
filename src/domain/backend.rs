//! Backend trait for short-code resolution.

use crate::domain::lookup::BackendResponse;
use async_trait::async_trait;
use axum::http::HeaderMap;

/// Errors raised by a backend adapter before any HTTP status is available.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request could not be completed (DNS, refused connection, timeout).
    #[error("{0}")]
    Transport(String),

    /// The lookup URL could not be built from the configured base URL.
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

/// Remote service that maps short codes to destination URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::backend::HttpRedirectBackend`] - HTTP client for the backend API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectBackend: Send + Sync {
    /// Looks up `code`, sending `headers` along with the request.
    ///
    /// Implementations must not follow redirects or serve cached replies.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] only when no HTTP response was received.
    /// Every HTTP status, including 4xx and 5xx, is returned as `Ok`.
    async fn lookup(&self, code: &str, headers: HeaderMap)
    -> Result<BackendResponse, BackendError>;

    /// Checks whether the backend answers HTTP requests at all.
    async fn health_check(&self) -> bool;
}
