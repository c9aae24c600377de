//! Integration tests for health endpoints.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;

    let response = app.get("/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(response.body["data"]["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_health_detailed_reports_components() {
    let app = helpers::TestApp::new().await;

    let response = app.get("/api/health/detailed").await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["status"], "ok");
    assert_eq!(data["record_store"]["backend"], "memory");
    assert_eq!(data["record_store"]["status"], "ok");
    assert_eq!(data["storage"]["backend"], "local");
    assert_eq!(data["storage"]["status"], "ok");
    assert_eq!(data["upload_strategy"], "proxied");
}

#[tokio::test]
async fn test_health_detailed_degrades_when_storage_root_is_gone() {
    let app = helpers::TestApp::new().await;
    std::fs::remove_dir_all(app.storage_root()).unwrap();

    let response = app.get("/api/health/detailed").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["data"]["status"], "degraded");
    assert_eq!(response.body["data"]["storage"]["status"], "unavailable");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = helpers::TestApp::new().await;

    let response = app.get("/api/nope").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
