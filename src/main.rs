//! ragchat CLI entry point.

use clap::Parser;

use ragchat::cli::{self, Cli, Commands};
use ragchat::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.config.as_deref(), cli.json).await {
        cli::handle_error(&err, cli.json);
    }
}

async fn run(command: Commands, config_path: Option<&std::path::Path>, json: bool) -> anyhow::Result<()> {
    let config = cli::load_config(config_path)?;
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    match command {
        Commands::Serve(args) => cli::commands::serve::execute(config, args).await,
        Commands::Ingest(args) => cli::commands::ingest::execute(config, args, json).await,
        Commands::Status => cli::commands::status::execute(config, json).await,
    }
}
