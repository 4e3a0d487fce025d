//! `rye`: run Rye Universal Checkout operations from a terminal.

mod cli;
mod commands;
mod config;

use clap::Parser;

use crate::cli::Cli;
use crate::config::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(&cli.global)?;
    let _guard = rye_log::init_with(config.log_config()?)?;

    commands::dispatch(cli.command, &config).await
}
