//! Command implementations

mod analyze;
mod config;
mod embed;
mod presets;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, output, config_file).await,
        Commands::Config(args) => config::execute(args, output, config_file),
        Commands::Embed(args) => embed::execute(args, output),
        Commands::Presets(args) => presets::execute(args, output),
    }
}
