//! Database migration management commands.

use clap::{Args, Subcommand};

use codedrop_core::error::AppError;
use codedrop_database::DatabasePool;
use codedrop_database::connection::mask_password;
use codedrop_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_path: Option<&str>) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    if config.database.is_memory() {
        return Err(AppError::validation(
            "Migrations only apply to the postgres backend (database.backend = \"memory\")",
        ));
    }

    match &args.command {
        MigrateCommand::Run => {
            println!(
                "Running database migrations against {}...",
                mask_password(&config.database.url)
            );
            let pool = DatabasePool::connect(&config.database).await?;
            let result = run_migrations(pool.pool()).await;
            pool.close().await;
            let known = result?;
            output::print_success(&format!("Schema is up to date ({known} migration(s))."));
        }
    }

    Ok(())
}
