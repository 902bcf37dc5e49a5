//! `check-poms`: validate the project and release parameters.

use crate::config::ReleaseConfiguration;
use crate::error::{ReleaseError, Result};
use crate::phase::ReleasePhase;
use crate::scm::ScmRepositoryConfigurator;
use async_trait::async_trait;
use std::sync::Arc;

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Checks that the POM exists, the SCM URL is usable and the versions make sense
#[derive(Debug)]
pub struct CheckPomsPhase {
    scm: Arc<ScmRepositoryConfigurator>,
}

impl CheckPomsPhase {
    /// Create the phase
    pub fn new(scm: Arc<ScmRepositoryConfigurator>) -> Self {
        Self { scm }
    }

    fn check(&self, config: &ReleaseConfiguration) -> Result<()> {
        let pom = config.pom_path();
        if !pom.is_file() {
            return Err(ReleaseError::failure(format!(
                "POM file {} does not exist",
                pom.display()
            )));
        }

        self.scm.configured_repository(config)?;

        let release_version = config
            .release_version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ReleaseError::failure("No release version specified"))?;

        if release_version.ends_with(SNAPSHOT_SUFFIX) {
            return Err(ReleaseError::failure(format!(
                "Release version '{}' must not be a snapshot",
                release_version
            )));
        }

        let development_version = config
            .development_version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ReleaseError::failure("No development version specified"))?;

        if development_version == release_version {
            return Err(ReleaseError::failure(format!(
                "Development version must differ from release version '{}'",
                release_version
            )));
        }

        if !development_version.ends_with(SNAPSHOT_SUFFIX) {
            log::warn!(
                "Development version '{}' is not a snapshot version",
                development_version
            );
        }

        Ok(())
    }
}

#[async_trait]
impl ReleasePhase for CheckPomsPhase {
    async fn execute(&self, config: &ReleaseConfiguration) -> Result<()> {
        self.check(config)?;
        log::info!(
            "Releasing {} as {} (tag {})",
            config.key(),
            config.release_version.as_deref().unwrap_or_default(),
            config.effective_release_label().unwrap_or_default()
        );
        Ok(())
    }

    async fn simulate(&self, config: &ReleaseConfiguration) -> Result<()> {
        self.check(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn project(dir: &TempDir) -> ReleaseConfiguration {
        std::fs::write(dir.path().join("pom.xml"), "<project/>").expect("write pom");
        ReleaseConfiguration::new("org.example", "widget")
            .with_working_directory(dir.path())
            .with_scm_connection_url("scm:git:https://example.org/widget.git")
            .with_versions("1.0", "1.1-SNAPSHOT")
    }

    fn phase() -> CheckPomsPhase {
        CheckPomsPhase::new(Arc::new(ScmRepositoryConfigurator::new()))
    }

    #[tokio::test]
    async fn test_valid_project_passes() {
        let dir = TempDir::new().expect("tempdir");
        phase().execute(&project(&dir)).await.expect("valid");
    }

    #[tokio::test]
    async fn test_snapshot_release_version_fails() {
        let dir = TempDir::new().expect("tempdir");
        let config = project(&dir).with_versions("1.0-SNAPSHOT", "1.1-SNAPSHOT");
        let err = phase().execute(&config).await.expect_err("snapshot");
        assert_eq!(err.kind(), ErrorKind::Failure);
    }

    #[tokio::test]
    async fn test_missing_pom_fails() {
        let dir = TempDir::new().expect("tempdir");
        let config = project(&dir).with_pom_file_name("missing.xml");
        assert!(phase().simulate(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_bad_scm_url_is_repository_error() {
        let dir = TempDir::new().expect("tempdir");
        let config = project(&dir).with_scm_connection_url("https://example.org");
        let err = phase().execute(&config).await.expect_err("bad url");
        assert_eq!(err.kind(), ErrorKind::ScmRepository);
    }
}
