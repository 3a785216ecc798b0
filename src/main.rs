// ABOUTME: Entry point for the stackswap CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use stackswap::config::Config;
use stackswap::error::Result;
use stackswap::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let config = load_config(&cli)?;
    let output = Output::new(mode);

    match cli.command {
        Commands::Deploy {
            component,
            environment,
            strategy,
            dry_run,
            keep_previous,
        } => {
            let args = commands::DeployArgs {
                component,
                environment,
                strategy,
                dry_run,
                keep_previous,
            };
            commands::deploy(&config, args, output).await
        }
        Commands::Status {
            component,
            environment,
        } => commands::status(&config, &component, environment.as_deref(), output).await,
    }
}
