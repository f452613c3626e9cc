//! Short-code resolution against the link backend.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{debug, info, warn};

use crate::domain::{ClientMetadata, RedirectBackend, Resolution};
use crate::error::AppError;

/// Service that turns a short code into a redirect target.
///
/// Each call performs at most one backend request and never retries.
/// Statically configured codes are answered locally.
pub struct RedirectService {
    backend: Arc<dyn RedirectBackend>,
    static_redirects: HashMap<String, String>,
}

impl RedirectService {
    /// Creates a new redirect service.
    pub fn new(backend: Arc<dyn RedirectBackend>, static_redirects: HashMap<String, String>) -> Self {
        Self {
            backend,
            static_redirects,
        }
    }

    /// Resolves `code` to a redirect target.
    ///
    /// # Flow
    ///
    /// 1. Reject an empty code (no backend call)
    /// 2. Answer statically configured codes (no backend call)
    /// 3. Forward the lookup with client metadata headers attached
    /// 4. Classify the backend reply
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `code` is empty
    /// - [`AppError::NotFound`] if the backend answers 404
    /// - [`AppError::Upstream`] for any other non-redirect reply, including a 3xx without `Location`;
    ///   the backend status is passed through
    /// - [`AppError::Transport`] if the backend could not be reached
    pub async fn resolve(
        &self,
        code: &str,
        client: &ClientMetadata,
    ) -> Result<Resolution, AppError> {
        let result = self.resolve_inner(code, client).await;

        let outcome = match &result {
            Ok(Resolution::Found(_)) => "redirect",
            Ok(Resolution::Permanent(_)) => "static_redirect",
            Err(e) => e.kind(),
        };
        metrics::counter!("redirect_outcomes_total", "outcome" => outcome).increment(1);

        result
    }

    async fn resolve_inner(
        &self,
        code: &str,
        client: &ClientMetadata,
    ) -> Result<Resolution, AppError> {
        if code.is_empty() {
            return Err(AppError::bad_request("Code parameter is required"));
        }

        if let Some(target) = self.static_redirects.get(code) {
            debug!(code, target = %target, "Static redirect");
            return Ok(Resolution::Permanent(target.clone()));
        }

        debug!(
            code,
            client_ip = client.client_ip().unwrap_or("-"),
            "Forwarding lookup to backend"
        );

        let response = self
            .backend
            .lookup(code, client.outbound_headers())
            .await
            .map_err(|e| {
                warn!(code, error = %e, "Backend lookup failed");
                AppError::from(e)
            })?;

        debug!(code, status = %response.status, "Backend responded");

        if let Some(location) = response.redirect_target() {
            info!(code, location, "Redirecting");
            return Ok(Resolution::Found(location.to_string()));
        }

        if response.status == StatusCode::NOT_FOUND {
            return Err(AppError::not_found("UTM link not found"));
        }

        warn!(
            code,
            status = %response.status,
            has_location = response.location.is_some(),
            "Unexpected backend response"
        );
        Err(AppError::upstream(response.status))
    }

    /// Reports whether the backend is reachable.
    pub async fn backend_healthy(&self) -> bool {
        self.backend.health_check().await
    }
}
