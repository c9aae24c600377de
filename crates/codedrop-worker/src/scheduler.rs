//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use codedrop_core::error::AppError;

use crate::jobs::PurgeJobHandler;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Handler for the expired-record purge
    purge: Arc<PurgeJobHandler>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(purge: Arc<PurgeJobHandler>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, purge })
    }

    /// Register the expired-record purge on `schedule` (6-field cron,
    /// seconds first).
    pub async fn register_share_purge(&self, schedule: &str) -> Result<(), AppError> {
        let purge = Arc::clone(&self.purge);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let purge = Arc::clone(&purge);
            Box::pin(async move {
                match purge.run().await {
                    Ok(summary) => tracing::debug!(%summary, "share_purge finished"),
                    Err(e) => tracing::error!(error = %e, "share_purge failed"),
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid share_purge schedule '{schedule}': {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add share_purge schedule: {e}")))?;

        tracing::info!(schedule, "Registered: share_purge");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
