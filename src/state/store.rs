//! File-backed configuration store.
//!
//! Records are JSON files named after the project key. Writes go through a
//! temporary sibling and an atomic rename so a crash mid-write never leaves a
//! truncated record behind, and an advisory lock file keeps two processes from
//! interleaving writes to the same record.

use super::ConfigurationStore;
use crate::config::{ProjectKey, ReleaseConfiguration};
use crate::error::StoreError;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Prefix of record file names
pub const RECORD_FILE_PREFIX: &str = "release-";

/// Store persisting one JSON record per project in a directory
#[derive(Debug, Clone)]
pub struct FileConfigurationStore {
    /// Directory holding the records
    state_dir: PathBuf,
}

/// Held advisory lock; released when dropped
#[derive(Debug)]
struct RecordLock {
    /// File handle that holds the flock
    _handle: fs::File,
}

impl FileConfigurationStore {
    /// Create a store rooted at the given directory
    pub fn new<P: AsRef<Path>>(state_dir: P) -> Self {
        Self {
            state_dir: state_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the records
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Path of the record for a project
    pub fn record_path(&self, key: &ProjectKey) -> PathBuf {
        self.state_dir.join(format!(
            "{}{}-{}.json",
            RECORD_FILE_PREFIX,
            sanitize(&key.group_id),
            sanitize(&key.artifact_id)
        ))
    }

    fn lock_path(&self, key: &ProjectKey) -> PathBuf {
        self.record_path(key).with_extension("lock")
    }

    /// Take the advisory lock for a record without blocking
    fn acquire_lock(&self, key: &ProjectKey) -> Result<RecordLock, StoreError> {
        let lock_path = self.lock_path(key);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| StoreError::Io {
                path: lock_path.clone(),
                source,
            })?;

        #[cfg(unix)]
        {
            #[allow(deprecated)]
            use nix::fcntl::{FlockArg, flock};
            use std::os::unix::io::AsRawFd;

            #[allow(deprecated)]
            match flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock) {
                Ok(()) => {}
                Err(e) if e == nix::errno::Errno::EWOULDBLOCK => {
                    return Err(StoreError::Locked { path: lock_path });
                }
                Err(e) => {
                    return Err(StoreError::Io {
                        path: lock_path,
                        source: std::io::Error::from(e),
                    });
                }
            }
        }

        Ok(RecordLock { _handle: file })
    }

    fn ensure_state_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.state_dir).map_err(|source| StoreError::Io {
            path: self.state_dir.clone(),
            source,
        })
    }
}

/// Replace characters that are awkward in file names
fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl ConfigurationStore for FileConfigurationStore {
    async fn read(&self, key: &ProjectKey) -> Result<ReleaseConfiguration, StoreError> {
        let path = self.record_path(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    key: key.to_string(),
                });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let config: ReleaseConfiguration =
            serde_json::from_str(&contents).map_err(|e| StoreError::Corrupted {
                reason: format!("Failed to deserialize {}: {}", path.display(), e),
            })?;

        config
            .validate()
            .map_err(|reason| StoreError::Corrupted { reason })?;

        log::debug!("Loaded release record {}", path.display());
        Ok(config)
    }

    async fn write(&self, config: &ReleaseConfiguration) -> Result<(), StoreError> {
        self.ensure_state_dir()?;
        let key = config.key();
        let _lock = self.acquire_lock(&key)?;

        let serialized = serde_json::to_string_pretty(&config.redacted())?;

        let record_path = self.record_path(&key);
        let temp_path = record_path.with_extension("tmp");
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };

        {
            let mut file = fs::File::create(&temp_path).map_err(io_err(&temp_path))?;
            file.write_all(serialized.as_bytes())
                .map_err(io_err(&temp_path))?;
            file.sync_all().map_err(io_err(&temp_path))?;
        }

        fs::rename(&temp_path, &record_path).map_err(io_err(&record_path))?;

        log::debug!(
            "Saved release record {} (completed phase: {})",
            record_path.display(),
            config.completed_phase.as_deref().unwrap_or("<none>")
        );
        Ok(())
    }

    async fn delete(&self, key: &ProjectKey) -> Result<(), StoreError> {
        let record_path = self.record_path(key);
        if !record_path.exists() {
            return Ok(());
        }

        let lock = self.acquire_lock(key)?;

        match fs::remove_file(&record_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::Io {
                    path: record_path,
                    source,
                });
            }
        }

        drop(lock);
        let _ = fs::remove_file(self.lock_path(key));

        log::debug!("Removed release record {}", record_path.display());
        Ok(())
    }

    async fn exists(&self, key: &ProjectKey) -> bool {
        self.record_path(key).exists()
    }
}
