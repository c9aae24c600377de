//! Local filesystem storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use codedrop_core::error::{AppError, ErrorKind};
use codedrop_core::result::AppResult;
use codedrop_core::traits::storage::{StorageProvider, StoredObject};

use crate::key::object_key;

/// Path prefix under which the HTTP server exposes the storage root.
pub const FILES_ROUTE: &str = "/files";

/// Local filesystem storage provider.
///
/// Objects are written below `root` and served back by the HTTP server at
/// `{public_base_url}/files/{key}`. Direct uploads are not supported.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored files.
    root: PathBuf,
    /// Base URL retrieval links are built from, without trailing slash.
    public_base_url: String,
}

impl LocalStorageProvider {
    /// Create a provider rooted at `root_path`, creating it if missing.
    pub async fn new(root_path: &str, public_base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Root directory on disk.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL for an object key.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}{FILES_ROUTE}/{key}", self.public_base_url)
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_start_matches('/'))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match fs::metadata(&self.root).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                "Failed to inspect storage root",
                e,
            )),
        }
    }

    async fn store(&self, name: &str, media_type: &str, data: Bytes) -> AppResult<StoredObject> {
        let key = object_key(name);
        let full_path = self.resolve(&key);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write object: {key}"), e)
        })?;

        debug!(key = %key, media_type, bytes = data.len(), "Stored object on local disk");
        Ok(StoredObject {
            url: self.url_for(&key),
            size_bytes: data.len() as u64,
            key,
        })
    }
}
