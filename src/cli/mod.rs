//! Command line interface for release_conductor.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, CredentialArgs, ProjectArgs, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;

/// Main CLI entry point; returns the process exit code
pub async fn run() -> anyhow::Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
