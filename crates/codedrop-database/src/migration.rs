//! Embedded schema migrations (`migrations/` at the workspace root).

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use codedrop_core::error::{AppError, ErrorKind};

/// Migrations compiled into the binary.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every embedded migration the database has not seen yet.
///
/// Returns the number of migrations known to this build.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, AppError> {
    let known = MIGRATOR.iter().count();
    info!(migrations = known, "Applying share record schema");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Dependency,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Share record schema is up to date");
    Ok(known)
}
