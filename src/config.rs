//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export BACKEND_SERVER_URL="https://api.example.com"
//! export STATIC_REDIRECTS="qr-business-card=https://villfields.com/"
//! ```
//!
//! ## Optional Variables
//!
//! - `BACKEND_SERVER_URL` - Base URL of the link backend (default: `http://localhost:3001`)
//! - `BACKEND_TIMEOUT_SECS` - Deadline for a single backend call (default: 10)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `RATE_LIMIT_PER_SECOND` - Token refill rate per client IP, `0` disables (default: 0)
//! - `RATE_LIMIT_BURST` - Token bucket size per client IP (default: 100)
//! - `STATIC_REDIRECTS` - Comma-separated `code=url` pairs answered without a backend call
//!   (default: `qr-business-card=https://villfields.com/`; set it empty to serve none)

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
/// Static redirects served when `STATIC_REDIRECTS` is unset.
pub const DEFAULT_STATIC_REDIRECTS: [(&str, &str); 1] =
    [("qr-business-card", "https://villfields.com/")];

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub backend_url: String,
    pub backend_timeout_secs: u64,
    pub log_level: String,
    pub log_format: String,
    /// Requests per second allowed per client IP on redirect routes. `0` disables rate limiting.
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    /// Short codes answered with a permanent redirect, keyed by code.
    pub static_redirects: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_timeout_secs: 10,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            rate_limit_per_second: 0,
            rate_limit_burst: 100,
            static_redirects: DEFAULT_STATIC_REDIRECTS
                .iter()
                .map(|&(code, target)| (code.to_string(), target.to_string()))
                .collect(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `STATIC_REDIRECTS` is malformed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = env::var("LISTEN").unwrap_or(defaults.listen_addr);
        let backend_url = env::var("BACKEND_SERVER_URL").unwrap_or(defaults.backend_url);
        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        let backend_timeout_secs = env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.backend_timeout_secs);

        let rate_limit_per_second = env::var("RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_per_second);

        let rate_limit_burst = env::var("RATE_LIMIT_BURST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_burst);

        let static_redirects = match env::var("STATIC_REDIRECTS") {
            Ok(raw) => parse_static_redirects(&raw).context("Failed to parse STATIC_REDIRECTS")?,
            Err(_) => defaults.static_redirects,
        };

        Ok(Self {
            listen_addr,
            backend_url,
            backend_timeout_secs,
            log_level,
            log_format,
            rate_limit_per_second,
            rate_limit_burst,
            static_redirects,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `backend_url` is not an absolute `http`/`https` URL
    /// - `backend_timeout_secs` is 0
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - rate limiting is enabled with a zero burst size
    pub fn validate(&self) -> Result<()> {
        let backend = Url::parse(&self.backend_url).with_context(|| {
            format!("BACKEND_SERVER_URL is not a valid URL: '{}'", self.backend_url)
        })?;
        if backend.scheme() != "http" && backend.scheme() != "https" {
            anyhow::bail!(
                "BACKEND_SERVER_URL must start with 'http://' or 'https://', got '{}'",
                self.backend_url
            );
        }

        if self.backend_timeout_secs == 0 {
            anyhow::bail!("BACKEND_TIMEOUT_SECS must be greater than 0");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.rate_limit_per_second > 0 && self.rate_limit_burst == 0 {
            anyhow::bail!("RATE_LIMIT_BURST must be at least 1 when rate limiting is enabled");
        }

        Ok(())
    }

    /// Returns whether per-IP rate limiting is enabled.
    pub fn is_rate_limited(&self) -> bool {
        self.rate_limit_per_second > 0
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Backend: {}", mask_connection_string(&self.backend_url));
        tracing::info!("  Backend timeout: {}s", self.backend_timeout_secs);

        if self.is_rate_limited() {
            tracing::info!(
                "  Rate limit: {}/s, burst {}",
                self.rate_limit_per_second,
                self.rate_limit_burst
            );
        } else {
            tracing::info!("  Rate limit: disabled");
        }

        tracing::info!("  Static redirects: {}", self.static_redirects.len());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Parses `code=url` pairs separated by commas.
///
/// Only the first `=` splits a pair, so target URLs may carry query strings.
/// Blank entries are ignored.
pub fn parse_static_redirects(raw: &str) -> Result<HashMap<String, String>> {
    let mut redirects = HashMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (code, target) = entry
            .split_once('=')
            .with_context(|| format!("expected 'code=url', got '{entry}'"))?;
        let (code, target) = (code.trim(), target.trim());

        if code.is_empty() {
            anyhow::bail!("empty code in '{entry}'");
        }
        Url::parse(target).with_context(|| format!("invalid target URL for '{code}'"))?;

        redirects.insert(code.to_string(), target.to_string());
    }

    Ok(redirects)
}

/// Hides the password of a URL before it is logged or printed.
///
/// Anything that is not a URL with a password is returned unchanged.
pub fn mask_connection_string(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => match parsed.set_password(Some("***")) {
            Ok(()) => parsed.into(),
            Err(()) => url.to_string(),
        },
        _ => url.to_string(),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if variables are malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
