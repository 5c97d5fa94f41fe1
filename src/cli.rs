//! Command-line interface definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::auth::{Role, TokenRef};

/// shortkey - a token-gated URL shortener
#[derive(Parser, Debug)]
#[command(name = "shortkey")]
#[command(version)]
#[command(about = "A token-gated URL shortener", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Manage bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },

    /// Purge stale links once and exit
    Sweep,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Issue a new random token
    Add {
        /// user or admin
        #[arg(long, default_value = "user")]
        role: Role,

        /// Free-form note stored next to the token
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List tokens (values masked)
    List,

    /// Revoke a token by its full value or by `#id` from `token list`
    Revoke { token: TokenRef },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
