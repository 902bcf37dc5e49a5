//! Release Conductor - resumable release orchestration for Maven projects.

use release_conductor::cli;
use release_conductor::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match cli::run().await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e:#}"));
            process::exit(2);
        }
    }
}
