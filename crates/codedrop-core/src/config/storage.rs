//! Storage provider configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Storage provider names accepted in `storage.default_provider`.
pub const SUPPORTED_PROVIDERS: &[&str] = &["local", "s3"];

/// How file bytes reach object storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStrategy {
    /// Bytes are posted to this service, which forwards them to storage.
    #[default]
    Proxied,
    /// The client uploads straight to storage through a pre-signed URL.
    Direct,
}

impl std::fmt::Display for UploadStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Proxied => write!(f, "proxied"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Default storage provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Upload strategy offered to clients.
    #[serde(default)]
    pub upload_strategy: UploadStrategy,
    /// Maximum proxied upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            upload_strategy: UploadStrategy::default(),
            max_upload_size_bytes: default_max_upload(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

impl StorageConfig {
    /// Whether the default provider can hand out pre-signed upload URLs.
    pub fn provider_supports_presign(&self) -> bool {
        self.default_provider == "s3"
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if !SUPPORTED_PROVIDERS.contains(&self.default_provider.as_str()) {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{}' (expected one of {:?})",
                self.default_provider, SUPPORTED_PROVIDERS
            )));
        }
        if self.default_provider == "s3" && self.s3.bucket.trim().is_empty() {
            return Err(AppError::configuration(
                "storage.s3.bucket must be set when the s3 provider is selected",
            ));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(AppError::configuration(
                "storage.max_upload_size_bytes must be positive",
            ));
        }
        Ok(())
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for local file storage.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO). Empty uses AWS.
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID. Empty falls back to the AWS default credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (`endpoint/bucket/key`).
    #[serde(default)]
    pub force_path_style: bool,
    /// Base URL that retrieval links are built from. Empty derives one
    /// from the endpoint or the AWS virtual-hosted style.
    #[serde(default)]
    pub public_base_url: String,
    /// Lifetime of pre-signed upload URLs in seconds.
    #[serde(default = "default_presign_expiry")]
    pub presign_expiry_seconds: u64,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: false,
            public_base_url: String::new(),
            presign_expiry_seconds: default_presign_expiry(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}

fn default_local_root() -> String {
    "./data/storage/local".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_presign_expiry() -> u64 {
    900
}
