//! Clean command implementation.
//!
//! Removes the release record and whatever the phases left behind.

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::manager::ReleaseManager;

/// Execute clean command
pub(super) async fn execute_clean(
    args: &Args,
    config: &RuntimeConfig,
    manager: &ReleaseManager,
) -> Result<()> {
    let key = args.command.project().key();
    config.verbose_println(&format!("Cleaning up release of {}...", key));

    // The stored record knows the POM name and directory the phases touched
    let target = match manager.stored(&key).await {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            config.println(&format!("No release record for {}", key));
            args.command.requested_configuration(&config.working_dir)
        }
        Err(e) => {
            config.warning_println(&format!("Ignoring unreadable release record: {}", e));
            args.command.requested_configuration(&config.working_dir)
        }
    };

    manager.clean(&target).await;
    config.success_println(&format!("Cleaned up release of {}", key));
    Ok(())
}
