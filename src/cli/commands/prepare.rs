//! Prepare command implementation.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::manager::ReleaseManager;

/// Execute prepare command
pub(super) async fn execute_prepare(
    args: &Args,
    config: &RuntimeConfig,
    manager: &ReleaseManager,
) -> Result<()> {
    let Command::Prepare {
        no_resume, dry_run, ..
    } = &args.command
    else {
        unreachable!("execute_prepare called with non-Prepare command");
    };

    let requested = args.command.requested_configuration(&config.working_dir);
    let key = requested.key();

    if *dry_run {
        config.println(&format!("🔍 Dry run: simulating release preparation of {}", key));
    } else {
        config.println(&format!("🚀 Preparing release of {}", key));
    }
    config.verbose_println(&format!("Phases: {}", manager.phases().names().join(", ")));

    let prepared = manager.prepare(requested, !*no_resume, *dry_run).await?;

    let label = prepared
        .effective_release_label()
        .unwrap_or_else(|| "<unlabelled>".to_string());
    if *dry_run {
        config.success_println(&format!("Dry run complete for {}", label));
        config.indent("Run 'clean' before preparing for real, or re-run with --no-resume");
    } else {
        config.success_println(&format!("Release {} prepared", label));
        config.indent("Run 'perform' to build and deploy it");
    }

    Ok(())
}
