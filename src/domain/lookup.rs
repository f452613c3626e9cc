//! Lookup results exchanged between the backend adapter and the redirect service.

use axum::http::StatusCode;

/// Raw reply of the backend redirect-lookup endpoint.
///
/// Redirects are never followed, so a 3xx reply arrives here as-is with its
/// `Location` header captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub location: Option<String>,
}

impl BackendResponse {
    pub fn new(status: StatusCode, location: Option<String>) -> Self {
        Self { status, location }
    }

    /// Returns the redirect target if the backend answered with a usable 3xx.
    pub fn redirect_target(&self) -> Option<&str> {
        if self.status.is_redirection() {
            self.location.as_deref()
        } else {
            None
        }
    }
}

/// Successful outcome of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Backend-resolved target, answered with `302 Found`.
    Found(String),
    /// Statically configured target, answered with `308 Permanent Redirect`.
    Permanent(String),
}

impl Resolution {
    pub fn location(&self) -> &str {
        match self {
            Self::Found(location) | Self::Permanent(location) => location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_target_requires_3xx_and_location() {
        let found = BackendResponse::new(StatusCode::FOUND, Some("https://a.example".into()));
        assert_eq!(found.redirect_target(), Some("https://a.example"));

        let moved = BackendResponse::new(StatusCode::MOVED_PERMANENTLY, None);
        assert_eq!(moved.redirect_target(), None);

        let ok = BackendResponse::new(StatusCode::OK, Some("https://a.example".into()));
        assert_eq!(ok.redirect_target(), None);
    }
}
