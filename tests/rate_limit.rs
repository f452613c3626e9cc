mod common;

use axum::Router;
use axum_test::TestServer;
use std::collections::HashMap;
use utm_redirect::api::middleware::rate_limit;
use utm_redirect::api::routes::redirect_routes;

#[tokio::test]
async fn test_rate_limit_per_client_ip() {
    let (backend_url, _recorder) = common::spawn_backend().await;
    let state = common::create_test_state(
        &backend_url,
        HashMap::from([("promo".to_string(), "https://example.com/".to_string())]),
    );

    let app: Router = redirect_routes()
        .layer(rate_limit::layer(1, 1).unwrap())
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let first = server
        .get("/r/promo")
        .add_header("x-forwarded-for", "1.2.3.4")
        .await;
    assert_eq!(first.status_code(), 308);

    let second = server
        .get("/r/promo")
        .add_header("x-forwarded-for", "1.2.3.4")
        .await;
    assert_eq!(second.status_code(), 429);

    let other_client = server
        .get("/r/promo")
        .add_header("x-forwarded-for", "5.6.7.8")
        .await;
    assert_eq!(other_client.status_code(), 308);
}
