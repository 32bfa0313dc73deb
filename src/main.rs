//! Hoard - persistence tier maintenance tool
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use hoard::cli::{Cli, Commands};
use hoard::config::{Config, ConfigManager};
use hoard::error::HoardResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> HoardResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let config = config_manager.load().await?;
    init_logging(cli.verbose, &config);

    match cli.command {
        Commands::Config(args) => hoard::cli::commands::config(args, &config, &config_manager).await,
        Commands::Cache(args) => hoard::cli::commands::cache(args, &config).await,
        Commands::Perms(args) => hoard::cli::commands::perms(args, &config).await,
        Commands::Voice(args) => hoard::cli::commands::voice(args, &config).await,
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let verbose = if config.general.verbose {
        verbose.max(1)
    } else {
        verbose
    };
    let filter = match verbose {
        0 => EnvFilter::new("hoard=warn"),
        1 => EnvFilter::new("hoard=info"),
        _ => EnvFilter::new("hoard=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
