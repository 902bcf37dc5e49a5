//! `run-preparation-goals`: build and verify the release version.

use crate::config::ReleaseConfiguration;
use crate::error::Result;
use crate::exec::BuildExecutor;
use crate::phase::ReleasePhase;
use async_trait::async_trait;
use std::sync::Arc;

/// Runs the configured preparation goals in the working directory
pub struct RunPreparationGoalsPhase {
    executor: Arc<dyn BuildExecutor>,
}

impl RunPreparationGoalsPhase {
    /// Create the phase
    pub fn new(executor: Arc<dyn BuildExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ReleasePhase for RunPreparationGoalsPhase {
    async fn execute(&self, config: &ReleaseConfiguration) -> Result<()> {
        log::info!("Verifying release: {}", config.preparation_goals);
        self.executor
            .run_goals(
                &config.working_directory,
                &config.preparation_goals,
                config.interactive,
                &config.pom_file_name,
                config.additional_arguments.as_deref(),
            )
            .await?;
        Ok(())
    }

    async fn simulate(&self, config: &ReleaseConfiguration) -> Result<()> {
        log::info!(
            "Would run '{}' in {}",
            config.preparation_goals,
            config.working_directory.display()
        );
        Ok(())
    }
}
