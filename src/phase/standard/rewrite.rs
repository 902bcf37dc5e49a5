//! `rewrite-poms-for-release` / `rewrite-poms-for-development`.
//!
//! Only the project's own `<version>` element is touched: the one that is a
//! direct child of `<project>`. A POM inheriting its version from `<parent>`
//! has none and cannot be rewritten.

use crate::config::ReleaseConfiguration;
use crate::error::{ReleaseError, Result};
use crate::phase::ReleasePhase;
use async_trait::async_trait;
use regex::Regex;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Suffix of the POM backup written before the first rewrite
pub const BACKUP_SUFFIX: &str = ".releaseBackup";

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("static regex is valid"));

static ELEMENT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z_][\w.:\-]*)[^>]*?(/?)>").expect("static regex is valid")
});

/// Which version a rewrite moves the project to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionTarget {
    /// The release version
    Release,
    /// The next development version
    Development,
}

/// Rewrites the project version in the POM
#[derive(Debug)]
pub struct RewritePomsPhase {
    target: VersionTarget,
}

/// Path of the backup kept next to a POM
pub fn backup_path(pom: &Path) -> PathBuf {
    let mut name = pom.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Project version and the byte range of its value in the POM text
fn locate_project_version(pom: &str) -> Option<(String, Range<usize>)> {
    let comments: Vec<Range<usize>> = COMMENT.find_iter(pom).map(|m| m.range()).collect();
    let mut open: Vec<&str> = Vec::new();

    for caps in ELEMENT_TAG.captures_iter(pom) {
        let tag = caps.get(0)?;
        if comments.iter().any(|c| c.contains(&tag.start())) {
            continue;
        }
        let name = caps.get(2)?.as_str();

        if !caps[1].is_empty() {
            if let Some(index) = open.iter().rposition(|n| *n == name) {
                open.truncate(index);
            }
            continue;
        }
        if !caps[3].is_empty() {
            continue;
        }

        if name == "version" && open.as_slice() == ["project"] {
            let start = tag.end();
            let end = start + pom[start..].find("</version>")?;
            let raw = &pom[start..end];
            let value = raw.trim();
            let value_start = start + (raw.len() - raw.trim_start().len());
            return Some((value.to_string(), value_start..value_start + value.len()));
        }
        open.push(name);
    }
    None
}

/// Version the POM declares for the project itself; `None` when inherited
pub fn project_version(pom: &str) -> Option<String> {
    locate_project_version(pom).map(|(version, _)| version)
}

impl RewritePomsPhase {
    /// Create the phase
    pub fn new(target: VersionTarget) -> Self {
        Self { target }
    }

    fn target_version<'a>(&self, config: &'a ReleaseConfiguration) -> Result<&'a str> {
        let (version, what) = match self.target {
            VersionTarget::Release => (config.release_version.as_deref(), "release"),
            VersionTarget::Development => (config.development_version.as_deref(), "development"),
        };
        version
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ReleaseError::failure(format!("No {} version specified", what)))
    }

    fn read_pom(pom: &Path) -> Result<String> {
        std::fs::read_to_string(pom).map_err(|e| {
            ReleaseError::execution_with(format!("Unable to read {}", pom.display()), e)
        })
    }

    fn current_version(pom: &Path, contents: &str) -> Result<(String, Range<usize>)> {
        locate_project_version(contents).ok_or_else(|| {
            ReleaseError::failure(format!(
                "No project version found in {}: the version is inherited from the parent; \
                 set it explicitly",
                pom.display()
            ))
        })
    }
}

#[async_trait]
impl ReleasePhase for RewritePomsPhase {
    async fn execute(&self, config: &ReleaseConfiguration) -> Result<()> {
        let target = self.target_version(config)?;
        let pom = config.pom_path();
        let contents = Self::read_pom(&pom)?;
        let (current, range) = Self::current_version(&pom, &contents)?;

        if current == target {
            log::info!("{} already at version {}", pom.display(), target);
            return Ok(());
        }

        let backup = backup_path(&pom);
        if !backup.exists() {
            std::fs::write(&backup, &contents).map_err(|e| {
                ReleaseError::execution_with(format!("Unable to back up {}", pom.display()), e)
            })?;
        }

        let mut rewritten = String::with_capacity(contents.len());
        rewritten.push_str(&contents[..range.start]);
        rewritten.push_str(target);
        rewritten.push_str(&contents[range.end..]);

        std::fs::write(&pom, rewritten).map_err(|e| {
            ReleaseError::execution_with(format!("Unable to write {}", pom.display()), e)
        })?;

        log::info!("Rewrote {} version {} -> {}", pom.display(), current, target);
        Ok(())
    }

    async fn simulate(&self, config: &ReleaseConfiguration) -> Result<()> {
        let target = self.target_version(config)?;
        let pom = config.pom_path();
        let contents = Self::read_pom(&pom)?;
        let (current, _) = Self::current_version(&pom, &contents)?;

        log::info!("Would rewrite {} version {} -> {}", pom.display(), current, target);
        Ok(())
    }

    async fn clean(&self, config: &ReleaseConfiguration) -> Result<()> {
        let backup = backup_path(&config.pom_path());
        match std::fs::remove_file(&backup) {
            Ok(()) => {
                log::debug!("Removed {}", backup.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReleaseError::execution_with(
                format!("Unable to remove {}", backup.display()),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const POM: &str = r#"<project>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>7</version>
  </parent>
  <artifactId>widget</artifactId>
  <version>1.0-SNAPSHOT</version>
  <dependencies>
    <dependency>
      <artifactId>lib</artifactId>
      <version>2.3</version>
    </dependency>
  </dependencies>
</project>
"#;

    fn project(dir: &TempDir) -> ReleaseConfiguration {
        std::fs::write(dir.path().join("pom.xml"), POM).expect("write pom");
        ReleaseConfiguration::new("org.example", "widget")
            .with_working_directory(dir.path())
            .with_versions("1.0", "1.1-SNAPSHOT")
    }

    #[test]
    fn test_project_version_skips_parent() {
        assert_eq!(project_version(POM).as_deref(), Some("1.0-SNAPSHOT"));
        assert_eq!(
            project_version("<project><version>3</version></project>").as_deref(),
            Some("3")
        );
        assert_eq!(project_version("<project/>"), None);
    }

    const INHERITED_POM: &str = r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <parent>
    <artifactId>parent</artifactId>
    <version>7</version>
  </parent>
  <!-- <version>0.1</version> -->
  <artifactId>widget</artifactId>
  <dependencies>
    <dependency>
      <artifactId>lib</artifactId>
      <version>2.3</version>
    </dependency>
  </dependencies>
  <build>
    <plugins>
      <plugin>
        <artifactId>compiler</artifactId>
        <version>3.1</version>
      </plugin>
    </plugins>
  </build>
</project>
"#;

    #[test]
    fn test_inherited_version_is_not_the_project_version() {
        assert_eq!(project_version(INHERITED_POM), None);
    }

    #[test]
    fn test_project_version_after_nested_versions() {
        let pom = "<project><dependencies><dependency><version>2.3</version></dependency>\
                   </dependencies><version> 4.0 </version></project>";
        assert_eq!(project_version(pom).as_deref(), Some("4.0"));
    }

    #[tokio::test]
    async fn test_rewrite_refuses_inherited_version() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("pom.xml"), INHERITED_POM).expect("write pom");
        let config = ReleaseConfiguration::new("org.example", "widget")
            .with_working_directory(dir.path())
            .with_versions("1.0", "1.1-SNAPSHOT");

        let error = RewritePomsPhase::new(VersionTarget::Release)
            .execute(&config)
            .await
            .expect_err("inherited version");

        assert!(error.is_failure());
        assert!(error.to_string().contains("inherited"));
        assert_eq!(std::fs::read_to_string(config.pom_path()).expect("pom"), INHERITED_POM);
        assert!(!backup_path(&config.pom_path()).exists());
    }

    #[tokio::test]
    async fn test_release_rewrite_is_idempotent() {
        let dir = TempDir::new().expect("tempdir");
        let config = project(&dir);
        let phase = RewritePomsPhase::new(VersionTarget::Release);

        phase.execute(&config).await.expect("first run");
        phase.execute(&config).await.expect("second run");

        let pom = std::fs::read_to_string(config.pom_path()).expect("pom");
        assert_eq!(project_version(&pom).as_deref(), Some("1.0"));
        assert!(pom.contains("<version>7</version>"));
        assert!(pom.contains("<version>2.3</version>"));

        let backup = std::fs::read_to_string(backup_path(&config.pom_path())).expect("backup");
        assert_eq!(backup, POM);
    }

    #[tokio::test]
    async fn test_simulate_leaves_pom_untouched() {
        let dir = TempDir::new().expect("tempdir");
        let config = project(&dir);
        RewritePomsPhase::new(VersionTarget::Development)
            .simulate(&config)
            .await
            .expect("simulate");

        assert_eq!(std::fs::read_to_string(config.pom_path()).expect("pom"), POM);
        assert!(!backup_path(&config.pom_path()).exists());
    }

    #[tokio::test]
    async fn test_clean_removes_backup_and_tolerates_absence() {
        let dir = TempDir::new().expect("tempdir");
        let config = project(&dir);
        let phase = RewritePomsPhase::new(VersionTarget::Release);

        phase.clean(&config).await.expect("nothing to clean");
        phase.execute(&config).await.expect("rewrite");
        assert!(backup_path(&config.pom_path()).exists());
        phase.clean(&config).await.expect("clean");
        assert!(!backup_path(&config.pom_path()).exists());
    }
}
