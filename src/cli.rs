// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use stackswap::deploy::DeployStrategy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stackswap")]
#[command(about = "Blue/green replacement of auto-scaled container cluster stacks")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: discover stackswap.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI (only final result)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Output JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a component, replacing its stack when needed
    Deploy {
        /// Component name (defined in config)
        component: String,

        /// Target environment (defaults to the configured environment)
        #[arg(short, long)]
        environment: Option<String>,

        /// Override the component's deployment strategy
        #[arg(long, value_enum)]
        strategy: Option<DeployStrategy>,

        /// Show what would happen without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Keep the replaced stack instead of deleting it
        #[arg(long)]
        keep_previous: bool,
    },

    /// Show the component's stacks, pool capacity and services
    Status {
        /// Component name (defined in config)
        component: String,

        /// Target environment (defaults to the configured environment)
        #[arg(short, long)]
        environment: Option<String>,
    },
}
