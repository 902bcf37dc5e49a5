//! Release configuration record.
//!
//! A [`ReleaseConfiguration`] carries every parameter of a release together with
//! the progress marker (`completed_phase`) that makes preparation resumable. It is
//! persisted after each completed phase by a [`ConfigurationStore`].
//!
//! [`ConfigurationStore`]: crate::state::ConfigurationStore

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Current version of the persisted record format
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// Default POM file name
pub const DEFAULT_POM_FILE_NAME: &str = "pom.xml";

/// Default goals run by the `run-preparation-goals` phase
pub const DEFAULT_PREPARATION_GOALS: &str = "clean verify";

/// Default prefix for SCM commit messages
pub const DEFAULT_SCM_COMMENT_PREFIX: &str = "[release]";

/// Identity of a project; the key under which its release record is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectKey {
    /// Project group
    pub group_id: String,
    /// Project artifact
    pub artifact_id: String,
}

impl ProjectKey {
    /// Create a new key
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// Complete release configuration and progress record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseConfiguration {
    /// Version of the record format
    pub format_version: u32,
    /// Project group
    pub group_id: String,
    /// Project artifact
    pub artifact_id: String,
    /// Directory holding the project being released
    pub working_directory: PathBuf,
    /// SCM connection URL, `scm:<provider>:<url>`
    #[serde(default)]
    pub scm_connection_url: Option<String>,
    /// Name of the last successfully finished phase
    #[serde(default)]
    pub completed_phase: Option<String>,
    /// Tag under which the release is recorded and later checked out
    #[serde(default)]
    pub release_label: Option<String>,
    /// Extra arguments passed to every build invocation
    #[serde(default)]
    pub additional_arguments: Option<String>,
    /// Whether builds may prompt the operator
    #[serde(default)]
    pub interactive: bool,
    /// POM file name relative to the working directory
    pub pom_file_name: String,
    /// Whether `perform` enables the release profile
    #[serde(default = "default_true")]
    pub use_release_profile: bool,
    /// Version the project is released as
    #[serde(default)]
    pub release_version: Option<String>,
    /// Version the project moves to after the release
    #[serde(default)]
    pub development_version: Option<String>,
    /// Goals run to verify the release before committing
    pub preparation_goals: String,
    /// Prefix for SCM commit messages
    pub scm_comment_prefix: String,
    /// SCM user name (never persisted)
    #[serde(skip)]
    pub scm_username: Option<String>,
    /// SCM password (never persisted)
    #[serde(skip)]
    pub scm_password: Option<String>,
    /// When the release was started
    pub started_at: DateTime<Utc>,
    /// When the record last changed
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl ReleaseConfiguration {
    /// Create a fresh configuration for a project
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            format_version: RECORD_FORMAT_VERSION,
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            working_directory: PathBuf::from("."),
            scm_connection_url: None,
            completed_phase: None,
            release_label: None,
            additional_arguments: None,
            interactive: false,
            pom_file_name: DEFAULT_POM_FILE_NAME.to_string(),
            use_release_profile: true,
            release_version: None,
            development_version: None,
            preparation_goals: DEFAULT_PREPARATION_GOALS.to_string(),
            scm_comment_prefix: DEFAULT_SCM_COMMENT_PREFIX.to_string(),
            scm_username: None,
            scm_password: None,
            started_at: now,
            updated_at: now,
        }
    }

    /// Set the working directory
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = dir.into();
        self
    }

    /// Set the SCM connection URL
    pub fn with_scm_connection_url(mut self, url: impl Into<String>) -> Self {
        self.scm_connection_url = Some(url.into());
        self
    }

    /// Set the release label
    pub fn with_release_label(mut self, label: impl Into<String>) -> Self {
        self.release_label = Some(label.into());
        self
    }

    /// Set the additional build arguments
    pub fn with_additional_arguments(mut self, args: impl Into<String>) -> Self {
        self.additional_arguments = Some(args.into());
        self
    }

    /// Set release and development versions
    pub fn with_versions(
        mut self,
        release_version: impl Into<String>,
        development_version: impl Into<String>,
    ) -> Self {
        self.release_version = Some(release_version.into());
        self.development_version = Some(development_version.into());
        self
    }

    /// Set the POM file name
    pub fn with_pom_file_name(mut self, name: impl Into<String>) -> Self {
        self.pom_file_name = name.into();
        self
    }

    /// Set the interactive flag
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Set whether `perform` enables the release profile
    pub fn with_use_release_profile(mut self, enabled: bool) -> Self {
        self.use_release_profile = enabled;
        self
    }

    /// Set the preparation goals
    pub fn with_preparation_goals(mut self, goals: impl Into<String>) -> Self {
        self.preparation_goals = goals.into();
        self
    }

    /// Set the completed phase (used when reconstituting records)
    pub fn with_completed_phase(mut self, phase: impl Into<String>) -> Self {
        self.completed_phase = Some(phase.into());
        self
    }

    /// Key identifying this project in the store
    pub fn key(&self) -> ProjectKey {
        ProjectKey::new(self.group_id.clone(), self.artifact_id.clone())
    }

    /// Record that a phase finished successfully
    pub fn mark_completed(&mut self, phase: &str) {
        self.completed_phase = Some(phase.to_string());
        self.updated_at = Utc::now();
    }

    /// Release label, falling back to `<artifact>-<release version>`
    pub fn effective_release_label(&self) -> Option<String> {
        self.release_label
            .clone()
            .filter(|label| !label.trim().is_empty())
            .or_else(|| {
                self.release_version
                    .as_ref()
                    .map(|version| format!("{}-{}", self.artifact_id, version))
            })
    }

    /// Path of the POM file inside the working directory
    pub fn pom_path(&self) -> PathBuf {
        self.working_directory.join(&self.pom_file_name)
    }

    /// Copy with credentials removed
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.scm_username = None;
        copy.scm_password = None;
        copy
    }

    /// Check the record is usable
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.format_version != RECORD_FORMAT_VERSION {
            return Err(format!(
                "record format version mismatch: expected {}, found {}",
                RECORD_FORMAT_VERSION, self.format_version
            ));
        }
        if self.group_id.trim().is_empty() || self.artifact_id.trim().is_empty() {
            return Err("group and artifact identifiers must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_release_label_falls_back_to_version() {
        let config = ReleaseConfiguration::new("org.example", "widget").with_versions("1.0", "1.1-SNAPSHOT");
        assert_eq!(config.effective_release_label().as_deref(), Some("widget-1.0"));

        let labelled = config.with_release_label("v1.0");
        assert_eq!(labelled.effective_release_label().as_deref(), Some("v1.0"));
    }

    #[test]
    fn test_blank_label_is_ignored() {
        let config = ReleaseConfiguration::new("org.example", "widget").with_release_label("  ");
        assert_eq!(config.effective_release_label(), None);
    }

    #[test]
    fn test_credentials_are_not_serialized() {
        let mut config = ReleaseConfiguration::new("org.example", "widget");
        config.scm_username = Some("alice".to_string());
        config.scm_password = Some("secret".to_string());

        let json = serde_json::to_string(&config).expect("serialize");
        assert!(!json.contains("secret"));
        assert!(!json.contains("alice"));
        assert!(config.redacted().scm_password.is_none());
    }

    #[test]
    fn test_validate_rejects_foreign_format() {
        let mut config = ReleaseConfiguration::new("org.example", "widget");
        assert!(config.validate().is_ok());
        config.format_version = 99;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_key_display() {
        let config = ReleaseConfiguration::new("org.example", "widget");
        assert_eq!(config.key().to_string(), "org.example:widget");
    }
}
