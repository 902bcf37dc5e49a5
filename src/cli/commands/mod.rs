//! Command execution: wiring the release manager and reporting outcomes.

mod clean;
mod perform;
mod prepare;
mod status;

use crate::cli::{Args, Command, OutputManager, RuntimeConfig};
use crate::exec::{BuildExecutor, MavenExecutor};
use crate::manager::ReleaseManager;
use crate::phase::PhaseRegistry;
use crate::scm::{GitScmProvider, ScmRepositoryConfigurator};
use crate::state::{ConfigurationStore, FileConfigurationStore};
use anyhow::Context;
use path_absolutize::Absolutize;
use std::sync::Arc;

use clean::execute_clean;
use perform::execute_perform;
use prepare::execute_prepare;
use status::execute_status;

/// Execute the subcommand and return the process exit code
pub async fn execute_command(args: Args) -> anyhow::Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(2);
    }

    let working_dir = match &args.working_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Unable to determine the current directory")?,
    };
    let working_dir = working_dir
        .absolutize()
        .with_context(|| format!("Invalid working directory {}", working_dir.display()))?
        .into_owned();

    let config = RuntimeConfig::new(working_dir, args.state_dir.clone(), args.verbose, args.quiet);
    let manager = build_manager(&args.command, &config)?;

    config.verbose_println(&format!(
        "Release records in {}",
        config.state_dir.display()
    ));

    let result = match &args.command {
        Command::Prepare { .. } => execute_prepare(&args, &config, &manager).await,
        Command::Perform { .. } => execute_perform(&args, &config, &manager).await,
        Command::Clean { .. } => execute_clean(&args, &config, &manager).await,
        Command::Status { .. } => execute_status(&args, &config, &manager).await,
    };

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            config.error_println(&format!("Command '{}' failed: {}", args.command.name(), e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.indent(&format!("• {}", suggestion));
                }
            }

            Ok(e.exit_code())
        }
    }
}

/// Assemble the manager and its collaborators for a subcommand.
///
/// Only `prepare` and `perform` drive git and Maven, so only they insist on
/// finding the executables.
fn build_manager(command: &Command, config: &RuntimeConfig) -> anyhow::Result<ReleaseManager> {
    let (git, maven) = match command {
        Command::Prepare { push, .. } => (
            GitScmProvider::locate()
                .context("git is required to prepare a release")?
                .push_changes(*push),
            MavenExecutor::locate().context("Maven is required to prepare a release")?,
        ),
        Command::Perform { .. } => (
            GitScmProvider::locate().context("git is required to perform a release")?,
            MavenExecutor::locate().context("Maven is required to perform a release")?,
        ),
        Command::Clean { .. } | Command::Status { .. } => (
            GitScmProvider::with_executable("git"),
            MavenExecutor::with_executable("mvn"),
        ),
    };

    let scm = Arc::new(ScmRepositoryConfigurator::new().with_provider("git", Arc::new(git)));
    let executor: Arc<dyn BuildExecutor> = Arc::new(maven);
    let store: Arc<dyn ConfigurationStore> = Arc::new(FileConfigurationStore::new(&config.state_dir));
    let phases = Arc::new(PhaseRegistry::standard(scm.clone(), executor.clone()));

    Ok(ReleaseManager::new(phases, store, scm, executor))
}
