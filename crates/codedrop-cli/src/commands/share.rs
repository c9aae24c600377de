//! Share code commands: issue, redeem, and purge against the configured
//! record store and storage provider.

use std::path::PathBuf;

use bytes::Bytes;
use clap::{ArgGroup, Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use codedrop_core::error::AppError;
use codedrop_service::IssueInput;
use codedrop_storage::mime::guess_media_type;

use crate::output::{self, OutputFormat};

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: ShareCommand,
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// Issue a code for a URL or a local file
    Issue(IssueArgs),
    /// Resolve a code to its URL
    Redeem {
        /// The code to redeem
        code: String,
    },
    /// Delete expired records now
    Purge {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Arguments for `share issue`
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "file"])))]
pub struct IssueArgs {
    /// URL of an already-uploaded file
    #[arg(long)]
    pub url: Option<String>,

    /// Local file to upload to the configured storage provider
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Issued code row
#[derive(Debug, Serialize, Tabled)]
struct IssuedRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Expires")]
    expires_at: String,
}

/// Redeemed code row
#[derive(Debug, Serialize, Tabled)]
struct RedeemedRow {
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "File")]
    file_name: String,
    #[tabled(rename = "Type")]
    media_type: String,
}

/// Execute share commands
pub async fn execute(
    args: &ShareArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    if config.database.is_memory() {
        output::print_warning(
            "database.backend is \"memory\"; records will not outlive this command",
        );
    }

    let (state, pool) = codedrop_api::build_state(config).await?;

    let result: Result<(), AppError> = async {
        match &args.command {
            ShareCommand::Issue(issue) => {
                let input = issue_input(issue).await?;
                let record = state.issuance_service.issue(input).await?;
                output::print_item(
                    &IssuedRow {
                        code: record.code.to_string(),
                        url: record.url,
                        expires_at: record
                            .expires_at
                            .map(|t| t.to_rfc3339())
                            .unwrap_or_else(|| "never".to_string()),
                    },
                    format,
                );
                Ok(())
            }
            ShareCommand::Redeem { code } => {
                let record = state.redemption_service.redeem(code).await?;
                output::print_item(
                    &RedeemedRow {
                        url: record.url,
                        file_name: record.file_name.unwrap_or_default(),
                        media_type: record.media_type.unwrap_or_default(),
                    },
                    format,
                );
                Ok(())
            }
            ShareCommand::Purge { yes } => purge(&state, *yes).await,
        }
    }
    .await;

    if let Some(pool) = pool {
        pool.close().await;
    }
    result
}

async fn issue_input(args: &IssueArgs) -> Result<IssueInput, AppError> {
    if let Some(url) = &args.url {
        return Ok(IssueInput::Url {
            url: url.clone(),
            file_name: None,
            media_type: None,
        });
    }

    let path = args
        .file
        .as_ref()
        .ok_or_else(|| AppError::validation("Either --url or --file is required"))?;

    let data = tokio::fs::read(path).await.map_err(|e| {
        AppError::validation(format!("Failed to read '{}': {e}", path.display()))
    })?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    let media_type = guess_media_type(&name).to_string();

    output::print_info(&format!("Uploading '{}' ({} bytes)", name, data.len()));

    Ok(IssueInput::Content {
        name,
        media_type,
        data: Bytes::from(data),
    })
}

async fn purge(state: &codedrop_api::AppState, yes: bool) -> Result<(), AppError> {
    if !yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("Delete all expired share records now?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = state.purge_service.purge_now().await?;
    output::print_success(&format!("Removed {removed} expired record(s)."));
    Ok(())
}
