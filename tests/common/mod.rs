//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use release_conductor::config::ProjectKey;
use release_conductor::error::{ExecutorError, ReleaseError, Result, StoreError};
use release_conductor::exec::BuildExecutor;
use release_conductor::state::{ConfigurationStore, MemoryConfigurationStore};
use release_conductor::{PhaseRegistry, ReleaseConfiguration, ReleasePhase};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const GROUP: &str = "org.example";
pub const ARTIFACT: &str = "widget";

pub fn key() -> ProjectKey {
    ProjectKey::new(GROUP, ARTIFACT)
}

pub fn release_config() -> ReleaseConfiguration {
    ReleaseConfiguration::new(GROUP, ARTIFACT)
        .with_scm_connection_url("scm:git:https://example.org/widget.git")
        .with_versions("1.0", "1.1-SNAPSHOT")
}

/// One observed phase invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub phase: String,
    pub action: &'static str,
    /// Persisted `completed_phase` at the moment the phase ran
    pub persisted: Option<String>,
}

impl Call {
    pub fn execute(phase: &str, persisted: Option<&str>) -> Self {
        Self {
            phase: phase.to_string(),
            action: "execute",
            persisted: persisted.map(str::to_string),
        }
    }
}

/// Shared journal of phase invocations
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Call>>>);

impl Journal {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().expect("journal lock").clone()
    }

    pub fn phases(&self, action: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.action == action)
            .map(|call| call.phase)
            .collect()
    }

    fn push(&self, call: Call) {
        self.0.lock().expect("journal lock").push(call);
    }
}

/// Phase that records every invocation and can be told to fail
pub struct RecordingPhase {
    name: String,
    journal: Journal,
    store: Arc<MemoryConfigurationStore>,
    fail_execute: bool,
    fail_clean: bool,
}

impl RecordingPhase {
    pub fn new(name: &str, journal: &Journal, store: &Arc<MemoryConfigurationStore>) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            store: store.clone(),
            fail_execute: false,
            fail_clean: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_execute = true;
        self
    }

    pub fn failing_clean(mut self) -> Self {
        self.fail_clean = true;
        self
    }

    fn record(&self, action: &'static str, config: &ReleaseConfiguration) {
        let persisted = self
            .store
            .snapshot(&config.key())
            .and_then(|record| record.completed_phase);
        self.journal.push(Call {
            phase: self.name.clone(),
            action,
            persisted,
        });
    }
}

#[async_trait]
impl ReleasePhase for RecordingPhase {
    async fn execute(&self, config: &ReleaseConfiguration) -> Result<()> {
        self.record("execute", config);
        if self.fail_execute {
            return Err(ReleaseError::failure(format!("{} exploded", self.name)));
        }
        Ok(())
    }

    async fn simulate(&self, config: &ReleaseConfiguration) -> Result<()> {
        self.record("simulate", config);
        Ok(())
    }

    async fn clean(&self, config: &ReleaseConfiguration) -> Result<()> {
        self.record("clean", config);
        if self.fail_clean {
            return Err(ReleaseError::execution(format!("{} cannot clean", self.name)));
        }
        Ok(())
    }
}

/// Registry of recording phases named `names`, in that order
pub fn recording_registry(
    names: &[&str],
    journal: &Journal,
    store: &Arc<MemoryConfigurationStore>,
) -> PhaseRegistry {
    names
        .iter()
        .fold(PhaseRegistry::builder(), |builder, name| {
            builder.phase(*name, Arc::new(RecordingPhase::new(name, journal, store)))
        })
        .build()
}

/// One observed build invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRun {
    pub directory: PathBuf,
    pub goals: String,
    pub interactive: bool,
    pub pom_file_name: String,
    pub extra_args: Option<String>,
}

/// Build executor that records its invocations and exits with a fixed code
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    runs: Mutex<Vec<BuildRun>>,
    exit_code: Option<i32>,
}

impl RecordingExecutor {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn exiting_with(code: i32) -> Self {
        Self {
            runs: Mutex::default(),
            exit_code: Some(code),
        }
    }

    pub fn runs(&self) -> Vec<BuildRun> {
        self.runs.lock().expect("runs lock").clone()
    }
}

#[async_trait]
impl BuildExecutor for RecordingExecutor {
    async fn run_goals(
        &self,
        directory: &Path,
        goals: &str,
        interactive: bool,
        pom_file_name: &str,
        extra_args: Option<&str>,
    ) -> std::result::Result<(), ExecutorError> {
        self.runs.lock().expect("runs lock").push(BuildRun {
            directory: directory.to_path_buf(),
            goals: goals.to_string(),
            interactive,
            pom_file_name: pom_file_name.to_string(),
            extra_args: extra_args.map(str::to_string),
        });

        match self.exit_code {
            Some(code) => Err(ExecutorError::Failed {
                command: format!("mvn {}", goals),
                code: Some(code),
            }),
            None => Ok(()),
        }
    }
}

/// Store that wraps a memory store and injects read or write failures
pub struct FaultyStore {
    inner: Arc<MemoryConfigurationStore>,
    corrupted: bool,
    writes_allowed: Option<usize>,
    writes: Mutex<usize>,
}

impl FaultyStore {
    /// Every read reports a corrupted record
    pub fn corrupted(inner: &Arc<MemoryConfigurationStore>) -> Self {
        Self {
            inner: inner.clone(),
            corrupted: true,
            writes_allowed: None,
            writes: Mutex::default(),
        }
    }

    /// The first `allowed` writes succeed, every later one fails
    pub fn failing_after_writes(inner: &Arc<MemoryConfigurationStore>, allowed: usize) -> Self {
        Self {
            inner: inner.clone(),
            corrupted: false,
            writes_allowed: Some(allowed),
            writes: Mutex::default(),
        }
    }
}

#[async_trait]
impl ConfigurationStore for FaultyStore {
    async fn read(&self, key: &ProjectKey) -> std::result::Result<ReleaseConfiguration, StoreError> {
        if self.corrupted {
            return Err(StoreError::Corrupted {
                reason: "expected value at line 1 column 1".to_string(),
            });
        }
        self.inner.read(key).await
    }

    async fn write(&self, config: &ReleaseConfiguration) -> std::result::Result<(), StoreError> {
        let attempt = {
            let mut writes = self.writes.lock().expect("writes lock");
            *writes += 1;
            *writes
        };
        if self.writes_allowed.is_some_and(|allowed| attempt > allowed) {
            return Err(StoreError::Io {
                path: PathBuf::from("release-org.example-widget.json"),
                source: std::io::Error::other("no space left on device"),
            });
        }
        self.inner.write(config).await
    }

    async fn delete(&self, key: &ProjectKey) -> std::result::Result<(), StoreError> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &ProjectKey) -> bool {
        self.inner.exists(key).await
    }
}

pub mod git;
