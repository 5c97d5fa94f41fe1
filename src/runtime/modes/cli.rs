//! CLI mode
//!
//! Token provisioning, a one-off sweep and sample config generation. Each
//! command opens storage directly; no server needs to be running.

use std::fmt;
use std::path::Path;

use chrono::Utc;
use colored::Colorize;

use crate::auth::{TokenRef, TokenStore};
use crate::cli::{Commands, ConfigCommands, TokenCommands};
use crate::config::{DEFAULT_CONFIG_PATH, StaticConfig, get_config};
use crate::runtime::lifetime::startup::prepare_storage;
use crate::services::ExpirySweeper;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::ShortkeyError> for CliError {
    fn from(err: crate::errors::ShortkeyError) -> Self {
        CliError::CommandError(err.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::StorageError(format!("{:#}", err))
    }
}

/// Run a non-server command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server mode".to_string(),
        )),
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => config_generate(output_path, force),
        },
        Commands::Sweep => sweep_now().await,
        Commands::Token { action } => {
            let tokens = TokenStore::new(prepare_storage().await?);
            match action {
                TokenCommands::Add { role, description } => {
                    token_add(&tokens, role, &description).await
                }
                TokenCommands::List => token_list(&tokens).await,
                TokenCommands::Revoke { token } => token_revoke(&tokens, &token).await,
            }
        }
    }
}

async fn token_add(
    tokens: &TokenStore,
    role: crate::auth::Role,
    description: &str,
) -> Result<(), CliError> {
    let token = tokens.issue(role, description).await?;

    println!("{} Issued {} token #{}", "✓".bold().green(), role, token.id);
    println!();
    println!("  {}", token.value.cyan().bold());
    println!();
    println!(
        "{} The token is shown only once; store it now",
        "ℹ".bold().blue()
    );
    Ok(())
}

async fn token_list(tokens: &TokenStore) -> Result<(), CliError> {
    let list = tokens.list().await?;

    if list.is_empty() {
        println!("{} No tokens found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Tokens:".bold().green());
    println!();
    for token in &list {
        let mut parts = vec![
            format!("#{}", token.id).dimmed().to_string(),
            token.masked().cyan().to_string(),
            format!("{} (level {})", token.role, token.level)
                .yellow()
                .to_string(),
        ];
        if let Some(left) = token.invites_left.filter(|n| *n > 0) {
            parts.push(format!("{} invites left", left).dimmed().to_string());
        }
        if !token.description.is_empty() {
            parts.push(token.description.white().to_string());
        }
        println!("  {}", parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} tokens",
        "ℹ".bold().blue(),
        list.len().to_string().green()
    );
    Ok(())
}

async fn token_revoke(tokens: &TokenStore, token: &TokenRef) -> Result<(), CliError> {
    tokens.revoke_ref(token).await?;
    println!("{} Token revoked", "✓".bold().green());
    Ok(())
}

async fn sweep_now() -> Result<(), CliError> {
    let storage = prepare_storage().await?;
    let grace = get_config().sweeper.grace_period();

    let purged = ExpirySweeper::sweep_once(&storage, grace, Utc::now()).await?;
    println!(
        "{} Purged {} stale links",
        "✓".bold().green(),
        purged.to_string().green()
    );
    Ok(())
}

/// Generate example configuration file
fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    if Path::new(&path).exists() && !force {
        return Err(CliError::CommandError(format!(
            "{} already exists, use --force to overwrite",
            path
        )));
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default().save_to_file(&path).map_err(|e| {
        CliError::CommandError(format!("Unable to write configuration file: {}", e))
    })?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}
