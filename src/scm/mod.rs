//! Source control collaborators.
//!
//! The release workflow only needs a handful of SCM operations: check out a
//! label, report local modifications, commit and tag. Providers implement
//! [`ScmProvider`]; the [`ScmRepositoryConfigurator`] turns a connection URL
//! from the release configuration into a repository and its provider.

mod git;
mod repository;

pub use git::GitScmProvider;
pub use repository::{ScmRepository, ScmRepositoryConfigurator};

use crate::error::ScmError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Outcome of a checkout that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckoutResult {
    /// Whether the provider considers the checkout successful
    pub success: bool,
    /// Short provider diagnostic
    pub provider_message: String,
    /// Raw output of the underlying command
    pub command_output: String,
}

impl CheckoutResult {
    /// Successful result
    pub fn succeeded(provider_message: impl Into<String>) -> Self {
        Self {
            success: true,
            provider_message: provider_message.into(),
            command_output: String::new(),
        }
    }

    /// Unsuccessful result with the command output kept for diagnostics
    pub fn failed(provider_message: impl Into<String>, command_output: impl Into<String>) -> Self {
        Self {
            success: false,
            provider_message: provider_message.into(),
            command_output: command_output.into(),
        }
    }
}

/// Operations the release workflow needs from a source control system
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScmProvider: Send + Sync {
    /// Check out `label` from the repository into `directory`.
    ///
    /// Transport failures are errors; a checkout that ran but did not succeed is
    /// reported through [`CheckoutResult::success`].
    async fn checkout(
        &self,
        repository: &ScmRepository,
        directory: &Path,
        label: &str,
    ) -> Result<CheckoutResult, ScmError>;

    /// Paths with local modifications under `directory`, relative to it
    async fn status(&self, directory: &Path) -> Result<Vec<String>, ScmError>;

    /// Commit the given files
    async fn commit(&self, directory: &Path, files: &[PathBuf], message: &str)
    -> Result<(), ScmError>;

    /// Tag the current state of `directory` as `label`
    async fn tag(&self, directory: &Path, label: &str, message: &str) -> Result<(), ScmError>;
}
