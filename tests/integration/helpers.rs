//! Shared test helpers for integration tests.
//!
//! Every test app runs on the in-memory record store and a local storage
//! provider rooted in a fresh temp directory, so no external services are
//! needed.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use codedrop_api::AppState;
use codedrop_core::config::AppConfig;
use codedrop_database::MemoryShareRecordStore;
use codedrop_storage::StorageManager;

/// Base URL the local provider builds retrieval links from.
pub const PUBLIC_BASE_URL: &str = "http://codedrop.test";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Record store backing the app, for direct inspection
    pub store: Arc<MemoryShareRecordStore>,
    /// Application config
    pub config: AppConfig,
    /// Local storage root; removed when the app is dropped
    storage_dir: TempDir,
}

impl TestApp {
    /// Create a test application with default settings
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after applying `customize` to the config
    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let storage_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.database.backend = "memory".to_string();
        config.worker.enabled = false;
        config.server.public_base_url = PUBLIC_BASE_URL.to_string();
        config.storage.default_provider = "local".to_string();
        config.storage.local.root_path = storage_dir.path().to_string_lossy().into_owned();
        customize(&mut config);
        config.validate().expect("Invalid test config");

        let store = Arc::new(MemoryShareRecordStore::new());
        let storage_manager =
            StorageManager::from_config(&config.storage, &config.server.public_base_url)
                .await
                .expect("Failed to init storage");

        let state = AppState::new(config.clone(), store.clone(), storage_manager)
            .expect("Failed to build state");
        let router = codedrop_api::build_app(state);

        Self {
            router,
            store,
            config,
            storage_dir,
        }
    }

    /// Root directory of the local storage provider
    pub fn storage_root(&self) -> &Path {
        self.storage_dir.path()
    }

    /// Make a JSON request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        self.send(
            Request::builder()
                .method(method)
                .uri(path)
                .header("Content-Type", "application/json")
                .body(Body::from(body_str))
                .expect("Failed to build request"),
        )
        .await
    }

    /// GET `path` without a body
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("GET")
                .uri(path)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
    }

    /// POST a raw body with an explicit content type
    pub async fn post_raw(&self, path: &str, content_type: &str, body: Vec<u8>) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("Content-Type", content_type)
                .body(Body::from(body))
                .expect("Failed to build request"),
        )
        .await
    }

    /// POST a single-part `multipart/form-data` body
    pub async fn post_multipart(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        media_type: &str,
        data: &[u8],
    ) -> TestResponse {
        let boundary = "codedrop-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {media_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        self.post_raw(
            path,
            &format!("multipart/form-data; boundary={boundary}"),
            body,
        )
        .await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw: body_bytes.to_vec(),
        }
    }

    /// Issue a code for `url` and return it
    pub async fn issue_url(&self, url: &str) -> i64 {
        let response = self
            .request("POST", "/api/issue", Some(serde_json::json!({ "url": url })))
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Issue failed: {:?}",
            response.body
        );
        response.body["data"]["code"]
            .as_i64()
            .expect("No code in issue response")
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Parsed JSON body (`Null` if not JSON)
    pub body: Value,
    /// Raw body bytes
    pub raw: Vec<u8>,
}
