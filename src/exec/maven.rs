//! Forked Maven executor.

use super::BuildExecutor;
use crate::config::DEFAULT_POM_FILE_NAME;
use crate::error::ExecutorError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Environment variable overriding the Maven executable
pub const MAVEN_EXECUTABLE_ENV: &str = "RELEASE_MVN";

/// Runs goals by spawning `mvn` as a child process
#[derive(Debug, Clone)]
pub struct MavenExecutor {
    executable: PathBuf,
}

impl MavenExecutor {
    /// Locate Maven via `RELEASE_MVN` or `PATH`
    pub fn locate() -> Result<Self, ExecutorError> {
        let name = std::env::var(MAVEN_EXECUTABLE_ENV).unwrap_or_else(|_| "mvn".to_string());
        let executable = which::which(&name)
            .map_err(|_| ExecutorError::NotFound { name: name.clone() })?;
        Ok(Self::with_executable(executable))
    }

    /// Use a specific executable
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Arguments passed to the executable, in order
    pub fn command_args(
        goals: &str,
        interactive: bool,
        pom_file_name: &str,
        extra_args: Option<&str>,
    ) -> Vec<String> {
        let mut args = Vec::new();

        if !interactive {
            args.push("--batch-mode".to_string());
        }

        if !pom_file_name.is_empty() && pom_file_name != DEFAULT_POM_FILE_NAME {
            args.push("-f".to_string());
            args.push(pom_file_name.to_string());
        }

        args.extend(goals.split_whitespace().map(str::to_string));

        if let Some(extra) = extra_args {
            args.extend(extra.split_whitespace().map(str::to_string));
        }

        args
    }
}

#[async_trait]
impl BuildExecutor for MavenExecutor {
    async fn run_goals(
        &self,
        directory: &Path,
        goals: &str,
        interactive: bool,
        pom_file_name: &str,
        extra_args: Option<&str>,
    ) -> Result<(), ExecutorError> {
        let args = Self::command_args(goals, interactive, pom_file_name, extra_args);
        let command_line = format!("{} {}", self.executable.display(), args.join(" "));
        log::info!("Executing: {}", command_line);

        let stdin = if interactive {
            Stdio::inherit()
        } else {
            Stdio::null()
        };

        let status = Command::new(&self.executable)
            .args(&args)
            .current_dir(directory)
            .stdin(stdin)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| ExecutorError::Launch {
                command: command_line.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExecutorError::Failed {
                command: command_line,
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_mode_when_not_interactive() {
        let args = MavenExecutor::command_args("clean verify", false, "pom.xml", None);
        assert_eq!(args, vec!["--batch-mode", "clean", "verify"]);
    }

    #[test]
    fn test_custom_pom_and_extra_args() {
        let args = MavenExecutor::command_args(
            "deploy",
            true,
            "release-pom.xml",
            Some("-Pfast  -DperformRelease=true"),
        );
        assert_eq!(
            args,
            vec!["-f", "release-pom.xml", "deploy", "-Pfast", "-DperformRelease=true"]
        );
    }

    #[tokio::test]
    async fn test_missing_executable_is_launch_error() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let executor = MavenExecutor::with_executable(dir.path().join("no-such-mvn"));
        let result = executor
            .run_goals(dir.path(), "verify", false, "pom.xml", None)
            .await;
        assert!(matches!(result, Err(ExecutorError::Launch { .. })));
    }
}
