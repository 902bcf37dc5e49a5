//! `end-release`: terminal marker of preparation.

use crate::config::ReleaseConfiguration;
use crate::error::Result;
use crate::phase::ReleasePhase;
use async_trait::async_trait;

/// Does nothing; completing it marks preparation as finished
#[derive(Debug, Default)]
pub struct EndReleasePhase;

#[async_trait]
impl ReleasePhase for EndReleasePhase {
    async fn execute(&self, config: &ReleaseConfiguration) -> Result<()> {
        log::info!(
            "Release preparation complete for {}; run perform to build the tagged release",
            config.key()
        );
        Ok(())
    }

    async fn simulate(&self, config: &ReleaseConfiguration) -> Result<()> {
        log::info!("Release preparation simulation complete for {}", config.key());
        Ok(())
    }
}
