//! Release orchestration.
//!
//! [`ReleaseManager`] drives the phase sequence of a [`PhaseRegistry`] against a
//! [`ReleaseConfiguration`], checkpointing the configuration after every phase
//! so an interrupted preparation can be resumed, and performs a prepared
//! release by building a fresh checkout of its label.

use crate::config::{ProjectKey, ReleaseConfiguration};
use crate::error::{ReleaseError, Result, StoreError};
use crate::exec::BuildExecutor;
use crate::phase::PhaseRegistry;
use crate::scm::ScmRepositoryConfigurator;
use crate::state::ConfigurationStore;
use path_absolutize::Absolutize;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Build argument enabling the release profile during `perform`
pub const RELEASE_PROFILE_ARGUMENT: &str = "-DperformRelease=true";

/// Where a project stands in the release lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReleaseStatus {
    /// No release record exists
    Fresh,
    /// Preparation started but has not reached the terminal phase
    InProgress {
        /// Last phase that finished, if any
        completed: Option<String>,
        /// Phase that runs next on resume
        next: Option<String>,
    },
    /// Preparation finished; the release can be performed
    Prepared,
}

/// Coordinates preparation, performing and cleanup of a release
#[derive(Clone)]
pub struct ReleaseManager {
    phases: Arc<PhaseRegistry>,
    store: Arc<dyn ConfigurationStore>,
    scm: Arc<ScmRepositoryConfigurator>,
    executor: Arc<dyn BuildExecutor>,
}

impl std::fmt::Debug for ReleaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseManager")
            .field("phases", &self.phases)
            .field("scm", &self.scm)
            .finish_non_exhaustive()
    }
}

impl ReleaseManager {
    /// Create a manager from its collaborators
    pub fn new(
        phases: Arc<PhaseRegistry>,
        store: Arc<dyn ConfigurationStore>,
        scm: Arc<ScmRepositoryConfigurator>,
        executor: Arc<dyn BuildExecutor>,
    ) -> Self {
        Self {
            phases,
            store,
            scm,
            executor,
        }
    }

    /// Phase registry driving preparation
    pub fn phases(&self) -> &PhaseRegistry {
        &self.phases
    }

    /// Prepare a release.
    ///
    /// With `resume`, a stored record for the project supersedes `requested`
    /// and preparation continues after its completed phase. With `dry_run`,
    /// phases are simulated instead of executed; progress is still recorded.
    /// Returns the configuration as of its final checkpoint.
    pub async fn prepare(
        &self,
        requested: ReleaseConfiguration,
        resume: bool,
        dry_run: bool,
    ) -> Result<ReleaseConfiguration> {
        let mut config = self.starting_configuration(requested, resume).await?;

        let names = self.phases.names();
        let start = config
            .completed_phase
            .as_deref()
            .and_then(|completed| self.phases.position(completed))
            .map_or(0, |index| index + 1);

        if start >= names.len() {
            log::info!(
                "Release preparation of {} already completed. You can now continue with perform, \
                 or start again using the --no-resume option.",
                config.key()
            );
            return Ok(config);
        }

        for name in &names[start..] {
            let phase = self.phases.get(name).ok_or_else(|| {
                ReleaseError::execution(format!("Unable to find phase '{}' to execute", name))
            })?;

            let outcome = if dry_run {
                log::info!("[dry-run] {}", name);
                phase.simulate(&config).await
            } else {
                log::info!("[prepare] {}", name);
                phase.execute(&config).await
            };
            outcome.map_err(|e| e.in_phase(name))?;

            config.mark_completed(name);
            self.store.write(&config).await.map_err(|e| {
                ReleaseError::execution_with(
                    format!("Error writing release configuration after '{}'", name),
                    e,
                )
            })?;
        }

        log::info!("Release preparation of {} complete", config.key());
        Ok(config)
    }

    async fn starting_configuration(
        &self,
        mut requested: ReleaseConfiguration,
        resume: bool,
    ) -> Result<ReleaseConfiguration> {
        if !resume {
            requested.completed_phase = None;
            return Ok(requested);
        }

        match self.store.read(&requested.key()).await {
            Ok(mut stored) => {
                log::info!(
                    "Resuming release of {} after '{}'",
                    stored.key(),
                    stored.completed_phase.as_deref().unwrap_or("<start>")
                );
                // Credentials are never stored; keep the ones supplied for this run
                stored.scm_username = requested.scm_username;
                stored.scm_password = requested.scm_password;
                Ok(stored)
            }
            Err(StoreError::NotFound { .. }) => {
                log::info!("No release in progress for {}, starting fresh", requested.key());
                requested.completed_phase = None;
                Ok(requested)
            }
            Err(e) => Err(ReleaseError::execution_with(
                "Error reading stored configuration",
                e,
            )),
        }
    }

    /// Perform a prepared release: check out its label into
    /// `checkout_directory` and run `goals` there.
    ///
    /// The stored record for `requested` is authoritative; only the SCM
    /// credentials are taken from `requested`. `use_release_profile` overrides
    /// the recorded release profile setting when given. On success the record
    /// and all phase residue are cleaned up.
    pub async fn perform(
        &self,
        requested: &ReleaseConfiguration,
        checkout_directory: &Path,
        goals: &str,
        use_release_profile: Option<bool>,
    ) -> Result<()> {
        let mut config = self.store.read(&requested.key()).await.map_err(|e| {
            ReleaseError::execution_with("Error reading stored configuration", e)
        })?;
        config.scm_username = requested.scm_username.clone();
        config.scm_password = requested.scm_password.clone();

        if let Some(completed) = config.completed_phase.as_deref()
            && Some(completed) != self.phases.terminal()
        {
            return Err(ReleaseError::failure(format!(
                "Cannot perform release - the preparation step was stopped mid-way. \
                 Please re-run prepare to complete it (last completed phase: '{}').",
                completed
            )));
        }

        let (repository, provider) = self.scm.resolve(&config)?;

        let checkout_directory = checkout_directory.absolutize().map_err(|e| {
            ReleaseError::execution_with(
                format!("Invalid checkout directory {}", checkout_directory.display()),
                e,
            )
        })?;
        recreate_directory(&checkout_directory).await?;

        let label = config.effective_release_label().ok_or_else(|| {
            ReleaseError::failure("No release label recorded; cannot check out the release")
        })?;

        log::info!("Checking out {} into {}", label, checkout_directory.display());
        let result = provider
            .checkout(&repository, &checkout_directory, &label)
            .await
            .map_err(|e| ReleaseError::execution_with("Error during checkout", e))?;

        if !result.success {
            return Err(ReleaseError::ScmCommand {
                message: "Unable to checkout from SCM".to_string(),
                result,
            });
        }

        let arguments = build_arguments(
            config.additional_arguments.as_deref(),
            use_release_profile.unwrap_or(config.use_release_profile),
        );

        log::info!("Running '{}' in {}", goals, checkout_directory.display());
        self.executor
            .run_goals(
                &checkout_directory,
                goals,
                config.interactive,
                &config.pom_file_name,
                arguments.as_deref(),
            )
            .await?;

        self.clean(&config).await;
        log::info!("Release {} performed", label);
        Ok(())
    }

    /// Delete the stored record and every phase's residue.
    ///
    /// Never fails; problems are logged and skipped.
    pub async fn clean(&self, config: &ReleaseConfiguration) {
        log::info!("Cleaning up release of {}", config.key());

        if let Err(e) = self.store.delete(&config.key()).await {
            log::warn!("Unable to delete release configuration: {}", e);
        }

        for (name, phase) in self.phases.implementations() {
            if let Err(e) = phase.clean(config).await {
                log::warn!("Cleaning up phase '{}' failed: {}", name, e);
            }
        }
    }

    /// The stored record for a project, if there is one
    pub async fn stored(&self, key: &ProjectKey) -> Result<Option<ReleaseConfiguration>> {
        match self.store.read(key).await {
            Ok(config) => Ok(Some(config)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(ReleaseError::execution_with(
                "Error reading stored configuration",
                e,
            )),
        }
    }

    /// Lifecycle position of a project's release
    pub async fn status(&self, key: &ProjectKey) -> Result<ReleaseStatus> {
        let Some(config) = self.stored(key).await? else {
            return Ok(ReleaseStatus::Fresh);
        };

        let completed = config.completed_phase;
        if completed.is_some() && completed.as_deref() == self.phases.terminal() {
            return Ok(ReleaseStatus::Prepared);
        }

        let next_index = completed
            .as_deref()
            .and_then(|name| self.phases.position(name))
            .map_or(0, |index| index + 1);

        Ok(ReleaseStatus::InProgress {
            next: self.phases.names().get(next_index).cloned(),
            completed,
        })
    }
}

/// Additional build arguments, with the release profile appended when enabled
fn build_arguments(existing: Option<&str>, use_release_profile: bool) -> Option<String> {
    let existing = existing.map(str::trim).filter(|args| !args.is_empty());

    match (existing, use_release_profile) {
        (Some(args), true) => Some(format!("{} {}", args, RELEASE_PROFILE_ARGUMENT)),
        (None, true) => Some(RELEASE_PROFILE_ARGUMENT.to_string()),
        (args, false) => args.map(str::to_string),
    }
}

/// Remove `dir` if present and create it empty
async fn recreate_directory(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => log::debug!("Removed existing checkout {}", dir.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ReleaseError::execution_with(
                format!("Unable to remove old checkout directory {}", dir.display()),
                e,
            ));
        }
    }

    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        ReleaseError::execution_with(
            format!("Unable to create checkout directory {}", dir.display()),
            e,
        )
    })
}
