//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod serve;
pub mod share;

use clap::{Parser, Subcommand};

use codedrop_core::config::AppConfig;
use codedrop_core::error::AppError;

use crate::output::OutputFormat;

/// CodeDrop: short numeric codes for shared files
#[derive(Debug, Parser)]
#[command(name = "codedrop", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to $CODEDROP_CONFIG, then
    /// config/default.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the CodeDrop server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Issue, redeem, and purge share codes
    Share(share::ShareArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config_path = self.config.as_deref();
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config_path).await,
            Commands::Migrate(args) => migrate::execute(args, config_path).await,
            Commands::Config(args) => config::execute(args, config_path, self.format).await,
            Commands::Share(args) => share::execute(args, config_path, self.format).await,
        }
    }
}

/// Helper: load configuration from the given file, or the default location
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    match config_path {
        Some(path) => AppConfig::load(path),
        None => AppConfig::load_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_share_redeem() {
        let cli =
            Cli::try_parse_from(["codedrop", "--format", "json", "share", "redeem", "48213"])
                .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Share(_)));
    }

    #[test]
    fn test_issue_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["codedrop", "share", "issue"]).is_err());
        assert!(
            Cli::try_parse_from([
                "codedrop",
                "share",
                "issue",
                "--url",
                "https://x.test/a",
                "--file",
                "a.txt",
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from(["codedrop", "share", "issue", "--url", "https://x.test/a"])
                .is_ok()
        );
    }
}
