//! Error types for release orchestration.
//!
//! The top-level [`ReleaseError`] mirrors the categories a caller needs to tell
//! apart: fatal tooling problems ([`ReleaseError::Execution`]), expected
//! business-rule failures ([`ReleaseError::Failure`]) and the two structured
//! SCM errors. Collaborators report their own narrower error types which are
//! converted at the boundary.

use crate::scm::CheckoutResult;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Boxed source error carried by [`ReleaseError::Execution`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Fatal or unexpected condition: persisting state, wiring defects,
    /// subprocess launch failures, SCM transport errors.
    #[error("{message}")]
    Execution {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxError>,
    },

    /// Expected failure that should be reported as a normal build failure
    #[error("{message}")]
    Failure {
        /// Human readable description
        message: String,
    },

    /// The SCM repository could not be resolved or failed validation
    #[error("{message}")]
    ScmRepository {
        /// Summary of the problem
        message: String,
        /// Every validation problem found
        validation_messages: Vec<String>,
    },

    /// An SCM command completed without throwing but reported failure
    #[error("{message}: {}", .result.provider_message)]
    ScmCommand {
        /// Summary of the problem
        message: String,
        /// The provider's result, kept for diagnostics
        result: CheckoutResult,
    },

    /// A phase failed during preparation
    #[error("Phase '{phase}' failed: {source}")]
    Phase {
        /// Name of the failing phase
        phase: String,
        /// What went wrong inside the phase
        #[source]
        source: Box<ReleaseError>,
    },
}

/// Coarse category of a [`ReleaseError`], ignoring phase annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`ReleaseError::Execution`]
    Execution,
    /// See [`ReleaseError::Failure`]
    Failure,
    /// See [`ReleaseError::ScmRepository`]
    ScmRepository,
    /// See [`ReleaseError::ScmCommand`]
    ScmCommand,
}

/// Configuration store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record exists for the key
    #[error("No stored release configuration for '{key}'")]
    NotFound {
        /// Display form of the project key
        key: String,
    },

    /// Record exists but cannot be understood
    #[error("Stored release configuration is corrupted: {reason}")]
    Corrupted {
        /// Reason for the error
        reason: String,
    },

    /// Another process holds the record lock
    #[error("Release configuration at {path} is locked by another process")]
    Locked {
        /// Path of the lock file
        path: PathBuf,
    },

    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Record could not be serialized
    #[error("Failed to serialize release configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// SCM provider errors (transport and protocol level)
#[derive(Error, Debug)]
pub enum ScmError {
    /// SCM executable could not be located
    #[error("SCM executable '{name}' not found on PATH")]
    ExecutableNotFound {
        /// Executable name
        name: String,
    },

    /// SCM command exited unsuccessfully
    #[error("Command '{command}' failed with exit code {code}: {stderr}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Exit code (-1 when terminated by a signal)
        code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// Process spawning or filesystem failure
    #[error("SCM I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// SCM repository resolution errors
#[derive(Error, Debug)]
pub enum ScmRepositoryError {
    /// The connection URL failed validation
    #[error("{message}")]
    Invalid {
        /// Summary of the problem
        message: String,
        /// Every validation problem found
        messages: Vec<String>,
    },

    /// No provider is registered for the repository type
    #[error("No SCM provider registered for '{kind}'")]
    NoSuchProvider {
        /// Provider identifier from the URL
        kind: String,
    },
}

/// Build executor errors
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The build process could not be started
    #[error("Unable to launch '{command}': {source}")]
    Launch {
        /// Command that could not be started
        command: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The build executable could not be located
    #[error("Build executable '{name}' not found on PATH")]
    NotFound {
        /// Executable name
        name: String,
    },

    /// The build ran and reported failure
    #[error("Build '{command}' failed with exit code {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    Failed {
        /// Command line that was run
        command: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
    },
}

impl ReleaseError {
    /// Create an execution error without a source
    pub fn execution(message: impl Into<String>) -> Self {
        ReleaseError::Execution {
            message: message.into(),
            source: None,
        }
    }

    /// Create an execution error wrapping a cause
    pub fn execution_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ReleaseError::Execution {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a failure error
    pub fn failure(message: impl Into<String>) -> Self {
        ReleaseError::Failure {
            message: message.into(),
        }
    }

    /// Annotate an error with the phase it came from
    pub fn in_phase(self, phase: &str) -> Self {
        ReleaseError::Phase {
            phase: phase.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through phase annotations
    pub fn root(&self) -> &ReleaseError {
        match self {
            ReleaseError::Phase { source, .. } => source.root(),
            other => other,
        }
    }

    /// Category of the innermost error
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            ReleaseError::Execution { .. } => ErrorKind::Execution,
            ReleaseError::Failure { .. } => ErrorKind::Failure,
            ReleaseError::ScmRepository { .. } => ErrorKind::ScmRepository,
            ReleaseError::ScmCommand { .. } => ErrorKind::ScmCommand,
            ReleaseError::Phase { .. } => unreachable!("root() never returns a phase annotation"),
        }
    }

    /// Name of the phase that failed, if the error came from one
    pub fn failed_phase(&self) -> Option<&str> {
        match self {
            ReleaseError::Phase { phase, .. } => Some(phase),
            _ => None,
        }
    }

    /// Whether this is an expected failure rather than a tooling defect
    pub fn is_failure(&self) -> bool {
        self.kind() == ErrorKind::Failure
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        if self.is_failure() { 1 } else { 2 }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        let mut suggestions = Vec::new();

        if let Some(phase) = self.failed_phase() {
            suggestions.push(format!(
                "Fix the problem reported by '{}' and re-run prepare; completed phases will not be repeated",
                phase
            ));
        }

        match self.root() {
            ReleaseError::ScmRepository {
                validation_messages,
                ..
            } => {
                for message in validation_messages {
                    suggestions.push(message.clone());
                }
                suggestions.push(
                    "Connection URLs take the form scm:<provider>:<url>, e.g. scm:git:https://host/repo.git"
                        .to_string(),
                );
            }
            ReleaseError::ScmCommand { result, .. } => {
                if !result.command_output.is_empty() {
                    suggestions.push(format!("SCM output: {}", result.command_output.trim()));
                }
                suggestions.push("Verify the release tag exists in the repository".to_string());
            }
            ReleaseError::Failure { .. } => {}
            ReleaseError::Execution { .. } => {
                suggestions.push(
                    "Run 'status' to inspect the stored progress, or 'clean' to start over"
                        .to_string(),
                );
            }
            ReleaseError::Phase { .. } => {}
        }

        suggestions
    }
}

impl From<ScmError> for ReleaseError {
    fn from(error: ScmError) -> Self {
        ReleaseError::execution_with(format!("SCM operation failed: {}", error), error)
    }
}

impl From<ExecutorError> for ReleaseError {
    fn from(error: ExecutorError) -> Self {
        match error {
            ExecutorError::Failed { .. } => ReleaseError::failure(error.to_string()),
            other => ReleaseError::execution_with(format!("Error executing build: {}", other), other),
        }
    }
}

impl From<ScmRepositoryError> for ReleaseError {
    fn from(error: ScmRepositoryError) -> Self {
        match error {
            ScmRepositoryError::Invalid { message, messages } => ReleaseError::ScmRepository {
                message,
                validation_messages: messages,
            },
            other => ReleaseError::execution_with(
                format!("Unable to configure SCM repository: {}", other),
                other,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_looks_through_phase_annotation() {
        let error = ReleaseError::failure("tree is dirty").in_phase("scm-check-modifications");
        assert_eq!(error.kind(), ErrorKind::Failure);
        assert_eq!(error.failed_phase(), Some("scm-check-modifications"));
        assert_eq!(error.exit_code(), 1);
        assert!(error.to_string().contains("scm-check-modifications"));
    }

    #[test]
    fn test_executor_failures_map_by_cause() {
        let failed: ReleaseError = ExecutorError::Failed {
            command: "mvn deploy".to_string(),
            code: Some(1),
        }
        .into();
        assert!(failed.is_failure());

        let launch: ReleaseError = ExecutorError::Launch {
            command: "mvn".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        }
        .into();
        assert_eq!(launch.kind(), ErrorKind::Execution);
        assert_eq!(launch.exit_code(), 2);
    }

    #[test]
    fn test_repository_validation_keeps_messages() {
        let error: ReleaseError = ScmRepositoryError::Invalid {
            message: "Invalid SCM connection URL".to_string(),
            messages: vec!["missing scm: prefix".to_string()],
        }
        .into();

        match &error {
            ReleaseError::ScmRepository {
                validation_messages,
                ..
            } => assert_eq!(validation_messages, &vec!["missing scm: prefix".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(
            error
                .recovery_suggestions()
                .iter()
                .any(|s| s == "missing scm: prefix")
        );
    }
}
