//! HTTP server initialization and runtime setup.
//!
//! Builds the backend client, wires the redirect service, and runs the Axum
//! server until Ctrl-C or SIGTERM.

use crate::api::middleware::rate_limit;
use crate::application::services::RedirectService;
use crate::config::Config;
use crate::domain::RedirectBackend;
use crate::infrastructure::backend::HttpRedirectBackend;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Builds application state from configuration.
///
/// # Errors
///
/// Returns an error if the backend client cannot be constructed.
pub fn build_state(config: &Config) -> Result<AppState> {
    let backend: Arc<dyn RedirectBackend> = Arc::new(
        HttpRedirectBackend::new(
            &config.backend_url,
            Duration::from_secs(config.backend_timeout_secs),
        )
        .context("Failed to create backend client")?,
    );

    let redirect_service = RedirectService::new(backend, config.static_redirects.clone());

    Ok(AppState::new(Arc::new(redirect_service)))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The backend client cannot be built
/// - The rate limiter configuration is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;
    tracing::info!("Backend client ready");

    let limiter = if config.is_rate_limited() {
        tracing::info!("Rate limiting enabled");
        Some(rate_limit::layer(
            config.rate_limit_per_second,
            config.rate_limit_burst,
        )?)
    } else {
        None
    };

    let app = app_router(state, limiter);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
