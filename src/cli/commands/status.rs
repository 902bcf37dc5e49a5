//! Status command implementation.
//!
//! Displays how far a project's release has progressed.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{ReleaseError, Result};
use crate::manager::{ReleaseManager, ReleaseStatus};

/// Execute status command
pub(super) async fn execute_status(
    args: &Args,
    config: &RuntimeConfig,
    manager: &ReleaseManager,
) -> Result<()> {
    let Command::Status { project, json } = &args.command else {
        unreachable!("execute_status called with non-Status command");
    };

    let key = project.key();
    config.verbose_println("Checking release status...");
    let status = manager.status(&key).await?;

    if *json {
        let rendered = serde_json::to_string_pretty(&status)
            .map_err(|e| ReleaseError::execution_with("Unable to render status", e))?;
        println!("{}", rendered);
        return Ok(());
    }

    match status {
        ReleaseStatus::Fresh => config.println(&format!("No release in progress for {}", key)),
        ReleaseStatus::InProgress { completed, next } => {
            config.println(&format!("📊 Release of {} in progress", key));
            config.indent(&format!(
                "Last completed phase: {}",
                completed.as_deref().unwrap_or("<none>")
            ));
            if let Some(next) = next {
                config.indent(&format!("Next phase: {}", next));
            }
        }
        ReleaseStatus::Prepared => {
            config.success_println(&format!("Release of {} is prepared and ready to perform", key))
        }
    }

    Ok(())
}
