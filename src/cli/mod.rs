//! Command line interface.
//!
//! Parses arguments (with GitHub Actions environment fallbacks), builds the
//! run context and drives the publish workflow.

mod args;
pub mod commands;
mod output;

pub use args::Args;
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
