//! Integration tests for code issuance.

mod helpers;

use http::StatusCode;
use serde_json::json;

use codedrop_database::ShareRecordStore;

#[tokio::test]
async fn test_issue_link_returns_code_in_range() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/issue",
            Some(json!({ "url": "https://example.com/f.pdf" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["success"], true);

    let data = &response.body["data"];
    let code = data["code"].as_i64().unwrap();
    assert!((10_000..=99_999).contains(&code), "code {code} out of range");
    assert_eq!(data["url"], "https://example.com/f.pdf");
    assert!(data["expires_at"].is_string());

    assert_eq!(app.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_issue_accepts_file_url_alias() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/issue",
            Some(json!({
                "fileUrl": "https://cdn.example.com/report.xlsx",
                "fileName": "report.xlsx",
                "fileType": "application/vnd.ms-excel"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let code = response.body["data"]["code"].as_i64().unwrap();

    let redeemed = app.get(&format!("/api/redeem?code={code}")).await;
    assert_eq!(redeemed.status, StatusCode::OK);
    assert_eq!(
        redeemed.body["data"]["url"],
        "https://cdn.example.com/report.xlsx"
    );
    assert_eq!(redeemed.body["data"]["file_name"], "report.xlsx");
}

#[tokio::test]
async fn test_issue_empty_body_is_validation_error() {
    let app = helpers::TestApp::new().await;

    let response = app.request("POST", "/api/issue", Some(json!({}))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(response.body["message"].is_string());
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_issue_blank_url_is_validation_error() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/api/issue", Some(json!({ "url": "   " })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_issue_malformed_json_is_validation_error() {
    let app = helpers::TestApp::new().await;

    let response = app
        .post_raw("/api/issue", "application/json", b"{\"url\":".to_vec())
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_issue_rejects_unsupported_content_type() {
    let app = helpers::TestApp::new().await;

    let response = app
        .post_raw("/api/issue", "text/plain", b"https://example.com/f.pdf".to_vec())
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_multipart_upload_is_stored_and_served() {
    let app = helpers::TestApp::new().await;
    let contents = b"hello from codedrop\n";

    let response = app
        .post_multipart("/api/issue", "file", "notes.txt", "text/plain", contents)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let url = response.body["data"]["url"].as_str().unwrap().to_string();
    let prefix = format!("{}/files/", helpers::PUBLIC_BASE_URL);
    assert!(url.starts_with(&prefix), "unexpected url {url}");
    assert!(url.ends_with("/notes.txt"));

    let key = &url[prefix.len()..];
    let on_disk = std::fs::read(app.storage_root().join(key)).unwrap();
    assert_eq!(on_disk, contents);

    let served = app.get(&format!("/files/{key}")).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.raw, contents);

    let code = response.body["data"]["code"].as_i64().unwrap();
    let redeemed = app.get(&format!("/api/redeem?code={code}")).await;
    assert_eq!(redeemed.body["data"]["url"], url.as_str());
    assert_eq!(redeemed.body["data"]["media_type"], "text/plain");
}

#[tokio::test]
async fn test_multipart_without_file_part_is_rejected() {
    let app = helpers::TestApp::new().await;

    let response = app
        .post_multipart("/api/issue", "attachment", "notes.txt", "text/plain", b"data")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let app = helpers::TestApp::new().await;

    let response = app
        .post_multipart("/api/issue", "file", "empty.bin", "application/octet-stream", b"")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upload_over_limit_is_payload_too_large() {
    let app = helpers::TestApp::with_config(|config| {
        config.storage.max_upload_size_bytes = 256;
    })
    .await;

    let response = app
        .post_multipart(
            "/api/issue",
            "file",
            "big.bin",
            "application/octet-stream",
            &[7u8; 4096],
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_upload_session_requires_direct_strategy() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/issue/session",
            Some(json!({ "file_name": "a.pdf", "media_type": "application/pdf" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upload_session_validates_body() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/issue/session",
            Some(json!({ "fileName": "", "fileType": "application/pdf" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "file_name is required");
}

#[tokio::test]
async fn test_codes_follow_configured_width() {
    let app = helpers::TestApp::with_config(|config| {
        config.share.code_width = 7;
        config.share.ttl_seconds = 0;
    })
    .await;

    let response = app
        .request(
            "POST",
            "/api/issue",
            Some(json!({ "url": "https://example.com/x" })),
        )
        .await;

    let code = response.body["data"]["code"].as_i64().unwrap();
    assert!((1_000_000..=9_999_999).contains(&code));
    assert!(response.body["data"]["expires_at"].is_null());
}
