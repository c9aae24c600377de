//! Application configuration schemas.
//!
//! All configuration structs are deserialized from a TOML file via the
//! `config` crate and overlaid with `CODEDROP__*` environment variables.
//! Each sub-module represents a logical configuration section.

pub mod app;
pub mod database;
pub mod logging;
pub mod share;
pub mod storage;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::share::ShareConfig;
use self::storage::{StorageConfig, UploadStrategy};
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Environment variable naming the configuration file to load.
pub const CONFIG_PATH_ENV: &str = "CODEDROP_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Object storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Share code issuance and expiry settings.
    #[serde(default)]
    pub share: ShareConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; every field has a default. Environment
    /// variables prefixed with `CODEDROP__` override file values, using `__`
    /// as the section separator (`CODEDROP__SHARE__CODE_WIDTH=6`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("CODEDROP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load using the path from `CODEDROP_CONFIG`, or the default path.
    pub fn load_default() -> Result<Self, AppError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(&path)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.share.validate()?;
        self.database.validate()?;
        self.storage.validate()?;

        if self.storage.upload_strategy == UploadStrategy::Direct
            && !self.storage.provider_supports_presign()
        {
            return Err(AppError::configuration(format!(
                "Upload strategy 'direct' requires a provider that can presign uploads, \
                 but default provider is '{}'",
                self.storage.default_provider
            )));
        }

        if self.server.rate_limit.enabled
            && (self.server.rate_limit.burst == 0
                || !self.server.rate_limit.per_second.is_finite()
                || self.server.rate_limit.per_second <= 0.0)
        {
            return Err(AppError::configuration(
                "Rate limit burst and per_second must be positive when enabled",
            ));
        }

        Ok(())
    }
}
