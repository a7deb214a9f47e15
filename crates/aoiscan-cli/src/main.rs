//! aoiscan CLI - Command-line interface
//!
//! Runs area-of-interest analyses and manages widget configuration.

mod cli;
mod commands;
mod config;
mod errors;
mod output;
mod output_types;
mod progress;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use output::OutputWriter;

fn main() -> Result<()> {
    // Logs go to stderr so `--json` output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Execute the command
    if let Err(err) = runtime.block_on(commands::execute(cli, &output)) {
        let cli_err = errors::from_anyhow(err);
        if output.is_json() {
            eprintln!("{}", serde_json::to_string_pretty(&cli_err.to_json())?);
        } else {
            cli_err.display();
        }
        std::process::exit(1);
    }

    Ok(())
}
