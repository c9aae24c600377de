//! Application state shared across all handlers and middleware.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use codedrop_core::config::AppConfig;
use codedrop_core::result::AppResult;
use codedrop_database::repositories::ShareRecordStore;
use codedrop_service::{IssuanceService, PurgeService, RedemptionService};
use codedrop_storage::StorageManager;

use crate::middleware::rate_limit::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped (or cheap to clone) so cloning per request is free.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When the state was built, for uptime reporting
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Share record store (Postgres or in-memory)
    pub record_store: Arc<dyn ShareRecordStore>,
    /// Storage provider manager
    pub storage_manager: Arc<StorageManager>,
    /// Per-client throttle for redemption (absent when disabled)
    pub redeem_limiter: Option<RateLimiter>,

    // ── Services ─────────────────────────────────────────────
    /// Code issuance
    pub issuance_service: Arc<IssuanceService>,
    /// Code redemption
    pub redemption_service: Arc<RedemptionService>,
    /// Expired record purge
    pub purge_service: Arc<PurgeService>,
}

impl AppState {
    /// Wire services around already-constructed collaborators.
    pub fn new(
        config: AppConfig,
        record_store: Arc<dyn ShareRecordStore>,
        storage_manager: StorageManager,
    ) -> AppResult<Self> {
        let storage = storage_manager.default_provider()?;

        let issuance_service = IssuanceService::new(
            Arc::clone(&record_store),
            storage,
            &config.share,
            config.storage.upload_strategy,
        )?;
        let redemption_service = RedemptionService::new(Arc::clone(&record_store), &config.share)?;
        let purge_service = PurgeService::new(Arc::clone(&record_store));

        let limits = &config.server.rate_limit;
        let redeem_limiter = limits
            .enabled
            .then(|| RateLimiter::new(limits.burst, limits.per_second));

        Ok(Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            record_store,
            storage_manager: Arc::new(storage_manager),
            redeem_limiter,
            issuance_service: Arc::new(issuance_service),
            redemption_service: Arc::new(redemption_service),
            purge_service: Arc::new(purge_service),
        })
    }

    /// Directory to serve under `/files`, when the local provider is the
    /// default.
    pub fn local_files_root(&self) -> Option<PathBuf> {
        (self.storage_manager.default_name() == "local")
            .then(|| PathBuf::from(&self.config.storage.local.root_path))
    }
}
