// Module declarations
pub(crate) mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fixer;
pub mod imports;
pub mod report;
pub mod resolve;
pub(crate) mod utils;

// Re-export main CLI functions
use anyhow::Result;

/// Main entry point for CLI usage
pub fn run_cli() -> Result<()> {
    cli::run_cli()
}

/// Entry point for CLI usage with custom arguments
pub fn run_cli_with<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    cli::run_cli_with(args)
}
