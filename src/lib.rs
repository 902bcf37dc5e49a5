//! # Release Conductor
//!
//! Resumable release orchestration for Maven projects.
//!
//! A release is prepared by running an ordered sequence of phases (validate the
//! POM, check the working tree, rewrite versions, build, commit, tag, ...) and
//! recording the last completed phase after each one. An interrupted
//! preparation resumes where it stopped. A prepared release is then performed
//! by checking out its tag into a clean directory and running the deploy build
//! there.
//!
//! ## Features
//!
//! - **Checkpointed Progress**: The release record is written after every phase
//! - **Dry Runs**: Simulate every phase without touching the project
//! - **Pluggable Phases**: Any ordered set of named phases can drive a release
//! - **Clean Recovery**: `clean` removes the record and every phase's residue
//!
//! ## Usage
//!
//! ```bash
//! release_conductor prepare --group-id org.example --artifact-id widget \
//!     --scm-url scm:git:https://example.org/widget.git \
//!     --release-version 1.0 --development-version 1.1-SNAPSHOT
//! release_conductor perform --group-id org.example --artifact-id widget
//! release_conductor status --group-id org.example --artifact-id widget
//! release_conductor clean --group-id org.example --artifact-id widget
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod manager;
pub mod phase;
pub mod scm;
pub mod state;

pub use cli::Args;
pub use config::{ProjectKey, ReleaseConfiguration};
pub use error::{ErrorKind, ReleaseError, Result};
pub use exec::{BuildExecutor, MavenExecutor};
pub use manager::{ReleaseManager, ReleaseStatus};
pub use phase::{PhaseRegistry, ReleasePhase, StandardPhase};
pub use scm::{CheckoutResult, GitScmProvider, ScmProvider, ScmRepository, ScmRepositoryConfigurator};
pub use state::{ConfigurationStore, FileConfigurationStore, MemoryConfigurationStore};
