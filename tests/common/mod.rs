#![allow(dead_code)]

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use utm_redirect::api::handlers::health_handler;
use utm_redirect::api::routes::redirect_routes;
use utm_redirect::application::services::RedirectService;
use utm_redirect::infrastructure::backend::HttpRedirectBackend;
use utm_redirect::state::AppState;

pub const LANDING_URL: &str =
    "https://example.com/landing?utm_source=newsletter&utm_medium=email&utm_campaign=spring";

/// Lookups received by the fake backend: short code and request headers.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<(String, HeaderMap)>>>,
}

impl Recorder {
    pub fn hits(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last(&self) -> (String, HeaderMap) {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("backend was not called")
    }
}

/// Fake backend redirect endpoint. The reply depends on the code:
///
/// - `found` / `moved` - 302 / 301 to [`LANDING_URL`]
/// - `nolocation` - 302 without `Location`
/// - `missing` - 404
/// - `broken` - 503
/// - anything else - 200 with a JSON body
async fn lookup(
    Path(code): Path<String>,
    State(recorder): State<Recorder>,
    headers: HeaderMap,
) -> Response {
    recorder.calls.lock().unwrap().push((code.clone(), headers));

    match code.as_str() {
        "found" => (StatusCode::FOUND, [(header::LOCATION, LANDING_URL)]).into_response(),
        "moved" => {
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, LANDING_URL)]).into_response()
        }
        "nolocation" => StatusCode::FOUND.into_response(),
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "broken" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => (StatusCode::OK, "{}").into_response(),
    }
}

/// Starts the fake backend on an ephemeral port and returns its base URL.
pub async fn spawn_backend() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/api/v1/utm-links/redirect/{code}", get(lookup))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), recorder)
}

/// Returns a base URL on which nothing listens.
pub async fn dead_backend_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn create_test_state(backend_url: &str, static_redirects: HashMap<String, String>) -> AppState {
    let backend = Arc::new(HttpRedirectBackend::new(backend_url, Duration::from_secs(5)).unwrap());
    let service = RedirectService::new(backend, static_redirects);
    AppState::new(Arc::new(service))
}

pub fn test_app(state: AppState) -> Router {
    Router::new()
        .merge(redirect_routes())
        .route("/health", get(health_handler))
        .with_state(state)
}
