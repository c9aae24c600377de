//! Integration tests for code redemption.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;

use codedrop_core::types::ShareCode;
use codedrop_database::ShareRecordStore;
use codedrop_entity::share::{NewShareRecord, ShareOrigin};

#[tokio::test]
async fn test_issue_then_redeem_round_trip() {
    let app = helpers::TestApp::new().await;
    let code = app.issue_url("https://example.com/f.pdf").await;

    let response = app.get(&format!("/api/redeem?code={code}")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["url"], "https://example.com/f.pdf");

    // Reusable by default.
    let again = app.get(&format!("/api/redeem?code={code}")).await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unissued_code_is_not_found() {
    let app = helpers::TestApp::new().await;

    let response = app.get("/api/redeem?code=99999").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
    assert_eq!(response.body["message"], "Invalid or expired code");
}

#[tokio::test]
async fn test_malformed_codes_are_rejected() {
    let app = helpers::TestApp::new().await;

    for query in ["code=abc", "code=1234", "code=123456", "code=01234", "code="] {
        let response = app.get(&format!("/api/redeem?{query}")).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "query {query}");
        assert_eq!(response.body["error"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_missing_code_is_rejected() {
    let app = helpers::TestApp::new().await;

    let response = app.get("/api/redeem").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Code is required");
}

#[tokio::test]
async fn test_expired_code_is_not_found() {
    let app = helpers::TestApp::new().await;
    app.store
        .insert(NewShareRecord {
            code: ShareCode(42424),
            url: "https://example.com/old.pdf".to_string(),
            origin: ShareOrigin::Link,
            file_name: None,
            media_type: None,
            expires_at: Some(Utc::now() - Duration::minutes(5)),
        })
        .await
        .unwrap();

    let response = app.get("/api/redeem?code=42424").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_single_use_code_redeems_once() {
    let app = helpers::TestApp::with_config(|config| {
        config.share.single_use = true;
    })
    .await;
    let code = app.issue_url("https://example.com/once.pdf").await;

    let first = app.get(&format!("/api/redeem?code={code}")).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.get(&format!("/api/redeem?code={code}")).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_redeem_is_rate_limited() {
    let app = helpers::TestApp::with_config(|config| {
        config.server.rate_limit.enabled = true;
        config.server.rate_limit.burst = 3;
        config.server.rate_limit.per_second = 0.01;
    })
    .await;

    for _ in 0..3 {
        let response = app.get("/api/redeem?code=99999").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    let limited = app.get("/api/redeem?code=99999").await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.body["error"], "RATE_LIMITED");
    assert!(limited.headers.contains_key("retry-after"));

    // Issuance is not throttled.
    let issue = app.issue_url("https://example.com/f.pdf").await;
    assert!(issue > 0);
}

#[tokio::test]
async fn test_rate_limit_can_be_disabled() {
    let app = helpers::TestApp::with_config(|config| {
        config.server.rate_limit.enabled = false;
    })
    .await;

    for _ in 0..50 {
        let response = app.get("/api/redeem?code=99999").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
