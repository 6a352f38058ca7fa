//! Bowtie CLI - Command-line interface for guided bowtie workflows
//!
//! Every command works on a session snapshot file:
//! - Create a session and collect items step by step
//! - Inspect progress and validate each step
//! - Convert collected items into the pathway dataset
//! - Run the completion gate

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{pathways, session};
use config::CliConfig;
pub use error::{CliError, CliResult};

/// Bowtie CLI application
#[derive(Parser)]
#[command(name = "bowtie")]
#[command(about = "Bowtie - guided environmental risk workflow CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json, yaml)
    #[arg(short, long)]
    output: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, env = "BOWTIE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Session(session::SessionCommands),

    #[command(flatten)]
    Pathways(pathways::PathwayCommands),
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing; logs go to stderr so stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    let config = CliConfig::load(cli.config.as_deref())?;
    let format = cli.output.or(config.output).unwrap_or_default();

    match cli.command {
        Commands::Session(command) => session::execute(command, &config, format),
        Commands::Pathways(command) => pathways::execute(command, &config, format),
    }
}
