//! Storage manager: builds the configured providers and resolves the
//! default one.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use codedrop_core::config::storage::StorageConfig;
use codedrop_core::error::AppError;
use codedrop_core::result::AppResult;
use codedrop_core::traits::storage::StorageProvider;

use crate::providers::LocalStorageProvider;

/// Registry of storage providers keyed by provider name.
///
/// Built once at startup; cloning shares the same providers.
#[derive(Debug, Clone)]
pub struct StorageManager {
    providers: HashMap<String, Arc<dyn StorageProvider>>,
    default_name: String,
}

impl StorageManager {
    /// Create a manager whose only provider is `provider`.
    pub fn single(provider: Arc<dyn StorageProvider>) -> Self {
        let name = provider.provider_type().to_string();
        let mut providers = HashMap::new();
        providers.insert(name.clone(), provider);
        Self {
            providers,
            default_name: name,
        }
    }

    /// Build the default provider named in `storage.default_provider`.
    ///
    /// `public_base_url` is the server's externally reachable address, used
    /// by the local provider to build retrieval links.
    pub async fn from_config(config: &StorageConfig, public_base_url: &str) -> AppResult<Self> {
        let provider: Arc<dyn StorageProvider> = match config.default_provider.as_str() {
            "local" => Arc::new(
                LocalStorageProvider::new(&config.local.root_path, public_base_url).await?,
            ),
            #[cfg(feature = "s3")]
            "s3" => Arc::new(crate::providers::S3StorageProvider::new(&config.s3).await?),
            other => {
                return Err(AppError::configuration(format!(
                    "Storage provider '{other}' is not available in this build"
                )));
            }
        };

        info!(
            provider = provider.provider_type(),
            strategy = ?config.upload_strategy,
            "Storage provider ready"
        );
        Ok(Self::single(provider))
    }

    /// Register an additional provider under its type name.
    pub fn register(&mut self, provider: Arc<dyn StorageProvider>) {
        self.providers
            .insert(provider.provider_type().to_string(), provider);
    }

    /// Get a provider by name.
    pub fn get(&self, name: &str) -> AppResult<Arc<dyn StorageProvider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::configuration(format!("Storage provider '{name}' not found")))
    }

    /// Get the default storage provider.
    pub fn default_provider(&self) -> AppResult<Arc<dyn StorageProvider>> {
        self.get(&self.default_name)
    }

    /// Name of the default provider.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Check health of all registered providers. A provider that errors
    /// counts as unhealthy.
    pub async fn health_check_all(&self) -> HashMap<String, bool> {
        let mut results = HashMap::new();
        for (name, provider) in &self.providers {
            let healthy = provider.health_check().await.unwrap_or(false);
            results.insert(name.clone(), healthy);
        }
        results
    }
}
