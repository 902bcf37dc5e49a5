//! External build execution.

mod maven;

pub use maven::{MAVEN_EXECUTABLE_ENV, MavenExecutor};

use crate::error::ExecutorError;
use async_trait::async_trait;
use std::path::Path;

/// Runs build goals in a project directory
#[async_trait]
pub trait BuildExecutor: Send + Sync {
    /// Run `goals` in `directory`.
    ///
    /// `extra_args` is a whitespace separated argument string appended after the
    /// goals; `None` or an empty string adds nothing.
    async fn run_goals(
        &self,
        directory: &Path,
        goals: &str,
        interactive: bool,
        pom_file_name: &str,
        extra_args: Option<&str>,
    ) -> Result<(), ExecutorError>;
}
