//! In-memory configuration store.

use super::ConfigurationStore;
use crate::config::{ProjectKey, ReleaseConfiguration};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Store keeping records in memory, with a log of every write.
///
/// For embedders that keep release progress elsewhere and for tests that
/// observe when checkpoints happen.
#[derive(Debug, Default)]
pub struct MemoryConfigurationStore {
    records: Mutex<HashMap<ProjectKey, ReleaseConfiguration>>,
    writes: Mutex<Vec<Option<String>>>,
}

impl MemoryConfigurationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one record
    pub fn with_record(config: ReleaseConfiguration) -> Self {
        let store = Self::new();
        store
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(config.key(), config);
        store
    }

    /// `completed_phase` of every record written so far, in write order
    pub fn write_log(&self) -> Vec<Option<String>> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Current record for a project, without going through the async API
    pub fn snapshot(&self, key: &ProjectKey) -> Option<ReleaseConfiguration> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl ConfigurationStore for MemoryConfigurationStore {
    async fn read(&self, key: &ProjectKey) -> Result<ReleaseConfiguration, StoreError> {
        self.snapshot(key).ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    async fn write(&self, config: &ReleaseConfiguration) -> Result<(), StoreError> {
        let record = config.redacted();
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.completed_phase.clone());
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(record.key(), record);
        Ok(())
    }

    async fn delete(&self, key: &ProjectKey) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }

    async fn exists(&self, key: &ProjectKey) -> bool {
        self.snapshot(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let store = MemoryConfigurationStore::new();
        let key = ProjectKey::new("org.example", "widget");
        assert!(matches!(
            store.read(&key).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(!store.exists(&key).await);
    }

    #[tokio::test]
    async fn test_write_logs_completed_phase() {
        let store = MemoryConfigurationStore::new();
        let mut config = ReleaseConfiguration::new("org.example", "widget");
        store.write(&config).await.expect("write");
        config.mark_completed("check-poms");
        store.write(&config).await.expect("write");

        assert_eq!(
            store.write_log(),
            vec![None, Some("check-poms".to_string())]
        );
        let stored = store.read(&config.key()).await.expect("read");
        assert_eq!(stored.completed_phase.as_deref(), Some("check-poms"));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let config = ReleaseConfiguration::new("org.example", "widget");
        let store = MemoryConfigurationStore::with_record(config.clone());
        store.delete(&config.key()).await.expect("first delete");
        store.delete(&config.key()).await.expect("second delete");
        assert!(!store.exists(&config.key()).await);
    }
}
