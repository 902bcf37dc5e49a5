//! Release phases and the registry that orders them.
//!
//! A phase is one named step of release preparation. Phases are looked up by
//! name from a [`PhaseRegistry`] whose insertion order is the execution order;
//! the progress marker persisted after each phase is that name.

mod registry;
pub mod standard;

pub use registry::{PhaseRegistry, PhaseRegistryBuilder};
pub use standard::StandardPhase;

use crate::config::ReleaseConfiguration;
use crate::error::Result;
use async_trait::async_trait;

/// A single named step of release preparation.
///
/// Implementations must tolerate being executed again after they already
/// succeeded: progress is recorded only after a phase returns, so a crash or a
/// failed checkpoint write means the phase runs again on resume.
#[async_trait]
pub trait ReleasePhase: Send + Sync {
    /// Perform the phase
    async fn execute(&self, config: &ReleaseConfiguration) -> Result<()>;

    /// Check and report what the phase would do, without side effects
    async fn simulate(&self, config: &ReleaseConfiguration) -> Result<()>;

    /// Remove anything the phase left behind. Must succeed when there is nothing to remove.
    async fn clean(&self, _config: &ReleaseConfiguration) -> Result<()> {
        Ok(())
    }
}
