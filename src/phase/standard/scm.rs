//! SCM-facing phases: modification check, commits and tagging.

use super::rewrite::BACKUP_SUFFIX;
use crate::config::ReleaseConfiguration;
use crate::error::{ReleaseError, Result};
use crate::phase::ReleasePhase;
use crate::scm::ScmRepositoryConfigurator;
use crate::state::RECORD_FILE_PREFIX;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Files the release itself creates; they never count as local modifications
fn is_release_bookkeeping(path: &str) -> bool {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);

    file_name.ends_with(BACKUP_SUFFIX)
        || file_name == "release.properties"
        || (file_name.starts_with(RECORD_FILE_PREFIX)
            && [".json", ".tmp", ".lock"]
                .iter()
                .any(|ext| file_name.ends_with(ext)))
}

/// Fails when the working tree has modifications other than release bookkeeping
#[derive(Debug)]
pub struct ScmCheckModificationsPhase {
    scm: Arc<ScmRepositoryConfigurator>,
}

impl ScmCheckModificationsPhase {
    /// Create the phase
    pub fn new(scm: Arc<ScmRepositoryConfigurator>) -> Self {
        Self { scm }
    }

    async fn check(&self, config: &ReleaseConfiguration) -> Result<()> {
        let (_, provider) = self.scm.resolve(config)?;
        let modified: Vec<String> = provider
            .status(&config.working_directory)
            .await?
            .into_iter()
            .filter(|path| !is_release_bookkeeping(path))
            .collect();

        if modified.is_empty() {
            return Ok(());
        }

        Err(ReleaseError::failure(format!(
            "Cannot prepare the release because you have local modifications:\n{}",
            modified
                .iter()
                .map(|path| format!("  {}", path))
                .collect::<Vec<_>>()
                .join("\n")
        )))
    }
}

#[async_trait]
impl ReleasePhase for ScmCheckModificationsPhase {
    async fn execute(&self, config: &ReleaseConfiguration) -> Result<()> {
        self.check(config).await
    }

    async fn simulate(&self, config: &ReleaseConfiguration) -> Result<()> {
        self.check(config).await
    }
}

/// Which version a commit records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTarget {
    /// Commit of the rewritten release version
    Release,
    /// Commit of the next development version
    Development,
}

/// Commits the POM
#[derive(Debug)]
pub struct ScmCommitPhase {
    scm: Arc<ScmRepositoryConfigurator>,
    target: CommitTarget,
}

impl ScmCommitPhase {
    /// Create the phase
    pub fn new(scm: Arc<ScmRepositoryConfigurator>, target: CommitTarget) -> Self {
        Self { scm, target }
    }

    /// Commit message for a configuration
    pub fn message(&self, config: &ReleaseConfiguration) -> String {
        match self.target {
            CommitTarget::Release => format!(
                "{} prepare release {}",
                config.scm_comment_prefix,
                config.effective_release_label().unwrap_or_default()
            ),
            CommitTarget::Development => format!(
                "{} prepare for next development iteration",
                config.scm_comment_prefix
            ),
        }
    }
}

#[async_trait]
impl ReleasePhase for ScmCommitPhase {
    async fn execute(&self, config: &ReleaseConfiguration) -> Result<()> {
        let (_, provider) = self.scm.resolve(config)?;
        let dir = &config.working_directory;

        let pending = provider.status(dir).await?;
        if !pending.iter().any(|path| path == &config.pom_file_name) {
            log::info!("{} has no changes to commit", config.pom_file_name);
            return Ok(());
        }

        let message = self.message(config);
        provider
            .commit(dir, &[PathBuf::from(&config.pom_file_name)], &message)
            .await?;
        log::info!("Committed: {}", message);
        Ok(())
    }

    async fn simulate(&self, config: &ReleaseConfiguration) -> Result<()> {
        self.scm.resolve(config)?;
        log::info!(
            "Would commit {} with message: {}",
            config.pom_file_name,
            self.message(config)
        );
        Ok(())
    }
}

/// Tags the working tree with the release label
#[derive(Debug)]
pub struct ScmTagPhase {
    scm: Arc<ScmRepositoryConfigurator>,
}

impl ScmTagPhase {
    /// Create the phase
    pub fn new(scm: Arc<ScmRepositoryConfigurator>) -> Self {
        Self { scm }
    }

    fn label(config: &ReleaseConfiguration) -> Result<String> {
        config
            .effective_release_label()
            .ok_or_else(|| ReleaseError::failure("No release label or release version specified"))
    }
}

#[async_trait]
impl ReleasePhase for ScmTagPhase {
    async fn execute(&self, config: &ReleaseConfiguration) -> Result<()> {
        let label = Self::label(config)?;
        let (_, provider) = self.scm.resolve(config)?;
        let message = format!("{} copy for tag {}", config.scm_comment_prefix, label);

        provider
            .tag(&config.working_directory, &label, &message)
            .await?;
        log::info!("Tagged release as {}", label);
        Ok(())
    }

    async fn simulate(&self, config: &ReleaseConfiguration) -> Result<()> {
        let label = Self::label(config)?;
        self.scm.resolve(config)?;
        log::info!("Would tag release as {}", label);
        Ok(())
    }
}
