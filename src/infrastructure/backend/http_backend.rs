//! HTTP implementation of [`RedirectBackend`] using `reqwest`.

use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use reqwest::{Client, redirect};
use url::Url;

use crate::domain::{BackendError, BackendResponse, RedirectBackend};

/// Path segments of the backend redirect-lookup endpoint, below the base URL.
const LOOKUP_PATH: [&str; 4] = ["api", "v1", "utm-links", "redirect"];

/// Client for the link backend API.
///
/// The underlying [`Client`] never follows redirects and enforces a per-request
/// timeout. It keeps no response cache, so every lookup reaches the backend.
#[derive(Clone)]
pub struct HttpRedirectBackend {
    client: Client,
    base_url: Url,
}

impl HttpRedirectBackend {
    /// Creates a backend client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] if `base_url` cannot be parsed or cannot
    /// carry a path, and [`BackendError::Transport`] if the HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url =
            Url::parse(base_url).map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(describe(&e)))?;

        Ok(Self { client, base_url })
    }

    /// Builds `{base}/api/v1/utm-links/redirect/{code}`.
    ///
    /// The code is percent-encoded as a single path segment, so `/`, `?` and `#`
    /// inside it cannot change the endpoint.
    pub fn lookup_url(&self, code: &str) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().extend(LOOKUP_PATH).push(code);
        }
        Ok(url)
    }
}

#[async_trait]
impl RedirectBackend for HttpRedirectBackend {
    async fn lookup(
        &self,
        code: &str,
        headers: HeaderMap,
    ) -> Result<BackendResponse, BackendError> {
        let url = self.lookup_url(code)?;

        tracing::debug!(url = %url, "Calling backend");

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| BackendError::Transport(describe(&e)))?;

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Ok(BackendResponse::new(response.status(), location))
    }

    async fn health_check(&self) -> bool {
        match self.client.get(self.base_url.clone()).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Backend health check failed: {}", describe(&e));
                false
            }
        }
    }
}

/// Renders a `reqwest` error with its source chain, e.g.
/// `error sending request for url (...): client error (Connect): tcp connect error: Connection refused`.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
