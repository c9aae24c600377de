//! S3-compatible object storage provider.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Builder as S3ConfigBuilder, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info};

use codedrop_core::config::storage::S3StorageConfig;
use codedrop_core::error::{AppError, ErrorKind};
use codedrop_core::result::AppResult;
use codedrop_core::traits::storage::{StorageProvider, StoredObject, UploadSession};

use crate::key::object_key;

/// S3-compatible storage provider (AWS, MinIO, R2, ...).
#[derive(Debug, Clone)]
pub struct S3StorageProvider {
    client: Client,
    bucket: String,
    public_base_url: String,
    presign_expiry: Duration,
}

impl S3StorageProvider {
    /// Build a client from the `storage.s3` configuration section.
    ///
    /// Static credentials are used when `access_key` is set; otherwise the
    /// AWS default credential chain applies.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 storage provider"
        );

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "codedrop-config",
            ));
        }
        let base = loader.load().await;

        let mut builder = S3ConfigBuilder::from(&base).force_path_style(config.force_path_style);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(config.endpoint.clone());
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_base_url: public_base_url(config),
            presign_expiry: Duration::from_secs(config.presign_expiry_seconds),
        })
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

/// Base URL retrieval links are built from, without trailing slash.
fn public_base_url(config: &S3StorageConfig) -> String {
    if !config.public_base_url.is_empty() {
        return config.public_base_url.trim_end_matches('/').to_string();
    }
    if !config.endpoint.is_empty() {
        return format!("{}/{}", config.endpoint.trim_end_matches('/'), config.bucket);
    }
    format!("https://{}.s3.{}.amazonaws.com", config.bucket, config.region)
}

#[async_trait]
impl StorageProvider for S3StorageProvider {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map(|_| true)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "S3 bucket is not reachable", e)
            })
    }

    async fn store(&self, name: &str, media_type: &str, data: Bytes) -> AppResult<StoredObject> {
        let key = object_key(name);
        let size_bytes = data.len() as u64;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(media_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Failed to upload object: {key}"), e)
            })?;

        debug!(key = %key, media_type, bytes = size_bytes, "Stored object in S3");
        Ok(StoredObject {
            url: self.url_for(&key),
            size_bytes,
            key,
        })
    }

    async fn create_upload_session(
        &self,
        name: &str,
        media_type: &str,
    ) -> AppResult<UploadSession> {
        let key = object_key(name);
        let presigning = PresigningConfig::expires_in(self.presign_expiry).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid presign expiry", e)
        })?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(media_type)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to presign upload URL", e)
            })?;

        let expires_at = Utc::now()
            + chrono::Duration::from_std(self.presign_expiry)
                .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid presign expiry", e))?;

        debug!(key = %key, media_type, "Created S3 upload session");
        Ok(UploadSession {
            upload_url: request.uri().to_string(),
            url: self.url_for(&key),
            expires_at,
            key,
        })
    }
}
