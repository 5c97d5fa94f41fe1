use anyhow::Context;
use clap::Parser;

use shortkey::cli::{Cli, Commands};
use shortkey::config::{get_config, init_config};
use shortkey::runtime::modes::{run_cli_command, run_server};
use shortkey::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());

    let config = get_config();
    let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        None | Some(Commands::Serve) => run_server().await,
        Some(cmd) => {
            if let Err(e) = run_cli_command(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
