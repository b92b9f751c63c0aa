mod common;

use std::time::Duration;

use axum_test::TestServer;

#[tokio::test]
async fn test_health_ok() {
    let ctx = common::create_test_state(10, Duration::from_secs(1800));
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "ok");
    assert!(body["version"].is_string());
}
