use anyhow::Result;
use clap::Parser;

use beebot_partner::{
    app::{load_config, load_config_from, AppState},
    cli::{handle_command, show_version, Cli, Commands},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    if let Commands::Version = cli.command {
        show_version();
        return Ok(());
    }

    // Load configuration
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    // Cold start: every command sees the persisted session
    let state = AppState::from_config(config)?;

    handle_command(&cli.command, &state, cli.output_format).await
}
