//! Mode routing
//!
//! - Server mode (HTTP server plus the expiry sweeper)
//! - CLI mode (token management, one-off sweep, config generation)

pub mod cli;
pub mod server;

pub use cli::run_cli_command;
pub use server::run_server;
