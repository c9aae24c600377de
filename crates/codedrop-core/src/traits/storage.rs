//! Storage provider trait for pluggable object storage backends.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::result::AppResult;

/// An object written by [`StorageProvider::store`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredObject {
    /// Key within the provider (e.g. `"<uuid>/report.pdf"`).
    pub key: String,
    /// Public retrieval URL for the object.
    pub url: String,
    /// Number of bytes written.
    pub size_bytes: u64,
}

/// A pre-signed upload the client performs directly against storage.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UploadSession {
    /// Key the object will be stored under.
    pub key: String,
    /// URL the client must `PUT` the bytes to.
    pub upload_url: String,
    /// URL the object will be retrievable from once uploaded.
    pub url: String,
    /// When `upload_url` stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Trait for object storage backends.
///
/// Implementations exist for the local filesystem and S3-compatible
/// stores. The trait is defined here in `codedrop-core` and implemented in
/// `codedrop-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Persist `data` under a fresh key derived from `name` and return
    /// where it can be retrieved.
    async fn store(&self, name: &str, media_type: &str, data: Bytes) -> AppResult<StoredObject>;

    /// Reserve a key and return a pre-signed upload URL for it.
    async fn create_upload_session(
        &self,
        name: &str,
        media_type: &str,
    ) -> AppResult<UploadSession> {
        let _ = (name, media_type);
        Err(AppError::not_implemented(format!(
            "Storage provider '{}' does not support direct uploads",
            self.provider_type()
        )))
    }
}
