mod common;

use axum_test::TestServer;
use std::collections::HashMap;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (backend_url, _recorder) = common::spawn_backend().await;
    let state = common::create_test_state(&backend_url, HashMap::new());
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["backend"]["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_endpoint_backend_down() {
    let backend_url = common::dead_backend_url().await;
    let state = common::create_test_state(&backend_url, HashMap::new());
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["backend"]["status"], "error");
}
