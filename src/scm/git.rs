//! Git provider driving the `git` executable.

use super::{CheckoutResult, ScmProvider, ScmRepository};
use crate::error::ScmError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Environment variable overriding the git executable
pub const GIT_EXECUTABLE_ENV: &str = "RELEASE_GIT";

/// Git implementation of [`ScmProvider`]
#[derive(Debug, Clone)]
pub struct GitScmProvider {
    git_executable: PathBuf,
    push_changes: bool,
}

impl GitScmProvider {
    /// Locate git via `RELEASE_GIT` or `PATH`
    pub fn locate() -> Result<Self, ScmError> {
        let name = std::env::var(GIT_EXECUTABLE_ENV).unwrap_or_else(|_| "git".to_string());
        let git_executable = which::which(&name)
            .map_err(|_| ScmError::ExecutableNotFound { name: name.clone() })?;
        Ok(Self::with_executable(git_executable))
    }

    /// Use a specific git executable
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            git_executable: executable.into(),
            push_changes: false,
        }
    }

    /// Push commits and tags to the upstream remote as they are created
    pub fn push_changes(mut self, push: bool) -> Self {
        self.push_changes = push;
        self
    }

    async fn run(&self, args: &[&str], working_dir: Option<&Path>) -> Result<std::process::Output, ScmError> {
        let mut cmd = Command::new(&self.git_executable);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        log::debug!("Running git {}", args.join(" "));
        Ok(cmd.output().await?)
    }

    async fn run_checked(&self, args: &[&str], working_dir: &Path) -> Result<String, ScmError> {
        let output = self.run(args, Some(working_dir)).await?;

        if !output.status.success() {
            return Err(ScmError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Paths from `git status --porcelain` output, made relative to the
/// directory whose repository-relative prefix is `prefix`
fn parse_porcelain(output: &str, prefix: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.len() > 3)
        .map(|line| {
            let path = &line[3..];
            // Renames are reported as "old -> new"
            let path = match path.split_once(" -> ") {
                Some((_, new)) => new,
                None => path,
            }
            .trim_matches('"');
            path.strip_prefix(prefix).unwrap_or(path).to_string()
        })
        .collect()
}

#[async_trait]
impl ScmProvider for GitScmProvider {
    async fn checkout(
        &self,
        repository: &ScmRepository,
        directory: &Path,
        label: &str,
    ) -> Result<CheckoutResult, ScmError> {
        let url = repository.authenticated_url();
        let target = directory.to_string_lossy().to_string();
        let output = self
            .run(&["clone", "--branch", label, url.as_str(), target.as_str()], None)
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if output.status.success() {
            if url != repository.url {
                // Keep credentials out of the checkout's .git/config
                self.run_checked(&["remote", "set-url", "origin", repository.url.as_str()], directory)
                    .await?;
            }
            Ok(CheckoutResult {
                success: true,
                provider_message: format!("Checked out '{}' from {}", label, repository.url),
                command_output: stderr,
            })
        } else {
            Ok(CheckoutResult::failed(
                format!(
                    "git clone exited with code {}",
                    output.status.code().unwrap_or(-1)
                ),
                stderr,
            ))
        }
    }

    async fn status(&self, directory: &Path) -> Result<Vec<String>, ScmError> {
        // Porcelain paths are relative to the repository root, not `directory`
        let prefix = self
            .run_checked(&["rev-parse", "--show-prefix"], directory)
            .await?;
        let output = self
            .run_checked(&["status", "--porcelain", "--untracked-files=all", "--", "."], directory)
            .await?;
        Ok(parse_porcelain(&output, prefix.trim()))
    }

    async fn commit(
        &self,
        directory: &Path,
        files: &[PathBuf],
        message: &str,
    ) -> Result<(), ScmError> {
        let file_args: Vec<String> = files
            .iter()
            .map(|f| f.to_string_lossy().to_string())
            .collect();

        let mut add_args = vec!["add", "--"];
        add_args.extend(file_args.iter().map(String::as_str));
        self.run_checked(&add_args, directory).await?;

        self.run_checked(&["commit", "-m", message], directory)
            .await?;

        if self.push_changes {
            self.run_checked(&["push"], directory).await?;
        }
        Ok(())
    }

    async fn tag(&self, directory: &Path, label: &str, message: &str) -> Result<(), ScmError> {
        let tag_ref = format!("refs/tags/{}", label);
        let existing = self
            .run(&["rev-parse", "--quiet", "--verify", tag_ref.as_str()], Some(directory))
            .await?;

        if existing.status.success() {
            log::info!("Tag {} already exists, not recreating it", label);
        } else {
            self.run_checked(&["tag", "-a", label, "-m", message], directory)
                .await?;
        }

        if self.push_changes {
            self.run_checked(&["push", "origin", label], directory)
                .await?;
        }
        Ok(())
    }
}
