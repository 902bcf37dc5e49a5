//! The standard release preparation workflow.
//!
//! [`StandardPhase`] is the closed set of built-in phases and
//! [`StandardPhase::ORDER`] their execution order. Every variant maps to an
//! implementation through an exhaustive `match`, so adding a phase without
//! wiring it is a compile error rather than a runtime lookup failure.

mod check_poms;
mod end_release;
mod rewrite;
mod run_goals;
mod scm;

pub use check_poms::CheckPomsPhase;
pub use end_release::EndReleasePhase;
pub use rewrite::{RewritePomsPhase, VersionTarget, backup_path, project_version};
pub use run_goals::RunPreparationGoalsPhase;
pub use scm::{CommitTarget, ScmCheckModificationsPhase, ScmCommitPhase, ScmTagPhase};

use super::{PhaseRegistry, ReleasePhase};
use crate::exec::BuildExecutor;
use crate::scm::ScmRepositoryConfigurator;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Built-in release phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardPhase {
    /// Validate the POM and release parameters
    CheckPoms,
    /// Refuse to release a working tree with local modifications
    ScmCheckModifications,
    /// Set the project version to the release version
    RewritePomsForRelease,
    /// Build and verify the release version
    RunPreparationGoals,
    /// Commit the release version
    ScmCommitRelease,
    /// Tag the release
    ScmTag,
    /// Set the project version to the next development version
    RewritePomsForDevelopment,
    /// Commit the development version
    ScmCommitDevelopment,
    /// Terminal marker: preparation is complete
    EndRelease,
}

impl StandardPhase {
    /// Execution order of the standard workflow
    pub const ORDER: [StandardPhase; 9] = [
        StandardPhase::CheckPoms,
        StandardPhase::ScmCheckModifications,
        StandardPhase::RewritePomsForRelease,
        StandardPhase::RunPreparationGoals,
        StandardPhase::ScmCommitRelease,
        StandardPhase::ScmTag,
        StandardPhase::RewritePomsForDevelopment,
        StandardPhase::ScmCommitDevelopment,
        StandardPhase::EndRelease,
    ];

    /// The phase whose completion means preparation is done
    pub const TERMINAL: StandardPhase = StandardPhase::EndRelease;

    /// Name recorded as the progress marker
    pub fn as_str(self) -> &'static str {
        match self {
            StandardPhase::CheckPoms => "check-poms",
            StandardPhase::ScmCheckModifications => "scm-check-modifications",
            StandardPhase::RewritePomsForRelease => "rewrite-poms-for-release",
            StandardPhase::RunPreparationGoals => "run-preparation-goals",
            StandardPhase::ScmCommitRelease => "scm-commit-release",
            StandardPhase::ScmTag => "scm-tag",
            StandardPhase::RewritePomsForDevelopment => "rewrite-poms-for-development",
            StandardPhase::ScmCommitDevelopment => "scm-commit-development",
            StandardPhase::EndRelease => "end-release",
        }
    }

    /// Build the implementation of this phase
    pub fn implementation(
        self,
        scm: &Arc<ScmRepositoryConfigurator>,
        executor: &Arc<dyn BuildExecutor>,
    ) -> Arc<dyn ReleasePhase> {
        match self {
            StandardPhase::CheckPoms => Arc::new(CheckPomsPhase::new(scm.clone())),
            StandardPhase::ScmCheckModifications => {
                Arc::new(ScmCheckModificationsPhase::new(scm.clone()))
            }
            StandardPhase::RewritePomsForRelease => {
                Arc::new(RewritePomsPhase::new(VersionTarget::Release))
            }
            StandardPhase::RunPreparationGoals => {
                Arc::new(RunPreparationGoalsPhase::new(executor.clone()))
            }
            StandardPhase::ScmCommitRelease => {
                Arc::new(ScmCommitPhase::new(scm.clone(), CommitTarget::Release))
            }
            StandardPhase::ScmTag => Arc::new(ScmTagPhase::new(scm.clone())),
            StandardPhase::RewritePomsForDevelopment => {
                Arc::new(RewritePomsPhase::new(VersionTarget::Development))
            }
            StandardPhase::ScmCommitDevelopment => {
                Arc::new(ScmCommitPhase::new(scm.clone(), CommitTarget::Development))
            }
            StandardPhase::EndRelease => Arc::new(EndReleasePhase),
        }
    }
}

impl fmt::Display for StandardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StandardPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StandardPhase::ORDER
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| format!("Unknown release phase '{}'", s))
    }
}

impl PhaseRegistry {
    /// Registry of the standard workflow
    pub fn standard(
        scm: Arc<ScmRepositoryConfigurator>,
        executor: Arc<dyn BuildExecutor>,
    ) -> PhaseRegistry {
        StandardPhase::ORDER
            .into_iter()
            .fold(PhaseRegistry::builder(), |builder, phase| {
                builder.phase(phase.as_str(), phase.implementation(&scm, &executor))
            })
            .build()
    }
}
