//! Workflow CLI - command-line interface for workflow documents
//!
//! This CLI provides workflow authors with a terminal interface to:
//! - Validate serialized documents against the workflow schema
//! - Inspect the tasks, steps and return binding of a document
//! - Generate the reference search-query workflow

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

pub use commands::sample::search_query_workflow;
pub use error::{CliError, CliResult};
pub use output::OutputFormat;

/// Workflow CLI application
#[derive(Parser)]
#[command(name = "wfdoc")]
#[command(about = "wfdoc - validate, inspect and generate workflow documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Check a document against the workflow schema
    Validate {
        /// Path to the workflow JSON document
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the tasks, steps and return value of a document
    Inspect {
        /// Path to the workflow JSON document
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Build the reference search-query workflow
    Sample {
        /// Write the document here instead of printing it
        #[arg(long)]
        out: Option<PathBuf>,
    },
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

    // Logs go to stderr so structured output stays parseable
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

    match cli.command {
        Commands::Validate { file } => commands::validate::execute(&file, cli.output),
        Commands::Inspect { file } => commands::inspect::execute(&file, cli.output),
        Commands::Sample { out } => commands::sample::execute(out.as_deref(), cli.output),
    }
}
