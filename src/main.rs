//! source-registry CLI entry point.

use anyhow::Result;
use clap::Parser;

use source_registry::application::RegistryRuntime;
use source_registry::cli::{commands, Cli, Commands};
use source_registry::infrastructure::config::ConfigLoader;
use source_registry::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        source_registry::cli::handle_error(err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;
    let runtime = RegistryRuntime::from_config(&config).await?;

    match cli.command {
        Commands::Discover(args) => commands::discover::execute(args, &runtime, cli.json).await,
        Commands::Route(args) => commands::route::execute(args, &runtime, cli.json).await,
        Commands::Tier1(args) => commands::tier1::execute(args, &runtime, cli.json).await,
        Commands::Blacklist(args) => commands::blacklist::execute(args, &runtime, cli.json).await,
        Commands::Health(args) => commands::health::execute(args, &runtime, cli.json).await,
        Commands::Metrics => commands::metrics::execute(&runtime, cli.json).await,
    }
}
