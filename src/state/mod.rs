//! Persistence of release configurations.
//!
//! The manager checkpoints progress through a [`ConfigurationStore`] after every
//! completed phase, which is what allows an interrupted preparation to resume
//! and a later `perform` to pick up where `prepare` left off.

mod memory;
mod store;

pub use memory::MemoryConfigurationStore;
pub use store::{FileConfigurationStore, RECORD_FILE_PREFIX};

use crate::config::{ProjectKey, ReleaseConfiguration};
use crate::error::StoreError;
use async_trait::async_trait;

/// Storage backend for release configuration records
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Load the record for a project; [`StoreError::NotFound`] when absent
    async fn read(&self, key: &ProjectKey) -> Result<ReleaseConfiguration, StoreError>;

    /// Persist a record, replacing any previous one for the same project
    async fn write(&self, config: &ReleaseConfiguration) -> Result<(), StoreError>;

    /// Remove the record for a project. Removing a missing record is not an error.
    async fn delete(&self, key: &ProjectKey) -> Result<(), StoreError>;

    /// Whether a record exists for a project
    async fn exists(&self, key: &ProjectKey) -> bool;
}
