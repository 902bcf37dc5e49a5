//! Perform command implementation.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::manager::ReleaseManager;

/// Execute perform command
pub(super) async fn execute_perform(
    args: &Args,
    config: &RuntimeConfig,
    manager: &ReleaseManager,
) -> Result<()> {
    let Command::Perform {
        checkout_dir,
        goals,
        no_release_profile,
        ..
    } = &args.command
    else {
        unreachable!("execute_perform called with non-Perform command");
    };

    let checkout_dir = match checkout_dir {
        Some(dir) => config.working_dir.join(dir),
        None => config.working_dir.join("target").join("checkout"),
    };

    let requested = args.command.requested_configuration(&config.working_dir);
    config.println(&format!(
        "📦 Performing release of {} in {}",
        requested.key(),
        checkout_dir.display()
    ));

    manager
        .perform(&requested, &checkout_dir, goals, no_release_profile.then_some(false))
        .await?;

    config.success_println(&format!("Release of {} performed", requested.key()));
    Ok(())
}
