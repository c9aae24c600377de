//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use codedrop_core::config::AppConfig;
use codedrop_core::error::AppError;
use codedrop_database::connection::mask_password;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file plus environment)
    Show,
    /// Validate the configuration
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = redacted(super::load_config(config_path)?);
            match format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Table => print_summary(&config),
            }
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success("Configuration is valid");
                print_summary(&redacted(config));
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}

/// Hide credentials before anything is printed.
fn redacted(mut config: AppConfig) -> AppConfig {
    config.database.url = mask_password(&config.database.url);
    if !config.storage.s3.secret_key.is_empty() {
        config.storage.s3.secret_key = "****".to_string();
    }
    config
}

fn print_summary(config: &AppConfig) {
    output::print_section("server");
    output::print_kv(
        "listen",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output::print_kv("public_base_url", &config.server.public_base_url);
    output::print_kv(
        "redeem rate limit",
        &if config.server.rate_limit.enabled {
            format!(
                "burst {} / {} per second",
                config.server.rate_limit.burst, config.server.rate_limit.per_second
            )
        } else {
            "disabled".to_string()
        },
    );

    output::print_section("database");
    output::print_kv("backend", &config.database.backend);
    if !config.database.is_memory() {
        output::print_kv("url", &config.database.url);
        output::print_kv("auto_migrate", &config.database.auto_migrate.to_string());
    }

    output::print_section("storage");
    output::print_kv("provider", &config.storage.default_provider);
    output::print_kv("upload_strategy", &config.storage.upload_strategy.to_string());
    output::print_kv(
        "max_upload_size_bytes",
        &config.storage.max_upload_size_bytes.to_string(),
    );

    output::print_section("share");
    output::print_kv("code_width", &config.share.code_width.to_string());
    output::print_kv(
        "max_issue_attempts",
        &config.share.max_issue_attempts.to_string(),
    );
    output::print_kv(
        "ttl",
        &match config.share.ttl_seconds {
            0 => "never expires".to_string(),
            secs => format!("{secs}s"),
        },
    );
    output::print_kv("single_use", &config.share.single_use.to_string());

    output::print_section("worker");
    output::print_kv(
        "purge_schedule",
        &if config.worker.enabled {
            config.worker.purge_schedule.clone()
        } else {
            "disabled".to_string()
        },
    );
}
