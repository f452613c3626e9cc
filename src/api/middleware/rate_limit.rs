//! Rate limiting middleware using token bucket algorithm.

use anyhow::{Context, Result};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Governor layer keyed by client IP.
pub type RateLimitLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a per-client rate limiter for redirect routes.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// The service runs behind a CDN, so the client IP is read from
/// `X-Forwarded-For`, `X-Real-IP` and `Forwarded` before falling back to the
/// socket peer address. The server must be started with connect info.
///
/// # Errors
///
/// Returns an error if `per_second` or `burst` is zero, or `per_second`
/// exceeds one request per nanosecond.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/r/{code}", get(redirect_handler))
///     .layer(rate_limit::layer(2, 100)?);
/// ```
pub fn layer(per_second: u64, burst: u32) -> Result<RateLimitLayer> {
    if per_second == 0 {
        anyhow::bail!("Rate limit must allow at least one request per second");
    }

    // One token is replenished every `period_ns` nanoseconds.
    let period_ns = NANOS_PER_SECOND / per_second;

    let governor_conf = GovernorConfigBuilder::default()
        .per_nanosecond(period_ns)
        .burst_size(burst)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .context("Invalid rate limit configuration")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}
