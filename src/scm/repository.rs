//! SCM connection URL parsing and provider lookup.

use super::ScmProvider;
use crate::config::ReleaseConfiguration;
use crate::error::ScmRepositoryError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A repository resolved from an `scm:<provider>:<url>` connection string
#[derive(Clone, PartialEq, Eq)]
pub struct ScmRepository {
    /// Provider identifier, e.g. `git`
    pub provider: String,
    /// Provider-specific URL
    pub url: String,
    /// User name for authenticated access
    pub username: Option<String>,
    /// Password for authenticated access
    pub password: Option<String>,
}

impl fmt::Debug for ScmRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScmRepository")
            .field("provider", &self.provider)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ScmRepository {
    /// Parse a connection string, collecting every validation problem
    pub fn parse(connection_url: &str) -> Result<Self, Vec<String>> {
        let mut messages = Vec::new();
        let connection_url = connection_url.trim();

        let Some(rest) = connection_url.strip_prefix("scm:") else {
            messages.push(format!(
                "The SCM URL '{}' must start with 'scm:'",
                connection_url
            ));
            return Err(messages);
        };

        // The character after the provider id is the delimiter; ':' or '|'
        let (provider, url) = match rest.find([':', '|']) {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, ""),
        };

        if provider.is_empty() {
            messages.push("The SCM provider must be specified after 'scm:'".to_string());
        }
        if url.trim().is_empty() {
            messages.push("The SCM provider URL must not be empty".to_string());
        }

        if messages.is_empty() {
            Ok(Self {
                provider: provider.to_string(),
                url: url.trim().to_string(),
                username: None,
                password: None,
            })
        } else {
            Err(messages)
        }
    }

    /// URL with credentials embedded, for http(s) remotes
    pub fn authenticated_url(&self) -> String {
        let Some(username) = &self.username else {
            return self.url.clone();
        };

        for scheme in ["https://", "http://"] {
            if let Some(rest) = self.url.strip_prefix(scheme) {
                return match &self.password {
                    Some(password) => format!("{scheme}{username}:{password}@{rest}"),
                    None => format!("{scheme}{username}@{rest}"),
                };
            }
        }
        self.url.clone()
    }
}

/// Resolves repositories from release configurations and finds their providers
#[derive(Clone, Default)]
pub struct ScmRepositoryConfigurator {
    providers: HashMap<String, Arc<dyn ScmProvider>>,
}

impl fmt::Debug for ScmRepositoryConfigurator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&String> = self.providers.keys().collect();
        kinds.sort();
        f.debug_struct("ScmRepositoryConfigurator")
            .field("providers", &kinds)
            .finish()
    }
}

impl ScmRepositoryConfigurator {
    /// Configurator with no providers registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider for a repository type
    pub fn with_provider(mut self, kind: impl Into<String>, provider: Arc<dyn ScmProvider>) -> Self {
        self.providers.insert(kind.into(), provider);
        self
    }

    /// Build the repository described by a release configuration
    pub fn configured_repository(
        &self,
        config: &ReleaseConfiguration,
    ) -> Result<ScmRepository, ScmRepositoryError> {
        let url = config
            .scm_connection_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ScmRepositoryError::Invalid {
                message: "No SCM connection URL configured".to_string(),
                messages: vec![
                    "Set the SCM connection URL for the project being released".to_string(),
                ],
            })?;

        let mut repository =
            ScmRepository::parse(url).map_err(|messages| ScmRepositoryError::Invalid {
                message: format!("Invalid SCM connection URL '{}'", url),
                messages,
            })?;

        repository.username = config.scm_username.clone();
        repository.password = config.scm_password.clone();
        Ok(repository)
    }

    /// Provider registered for a repository's type
    pub fn provider(
        &self,
        repository: &ScmRepository,
    ) -> Result<Arc<dyn ScmProvider>, ScmRepositoryError> {
        self.providers
            .get(&repository.provider)
            .cloned()
            .ok_or_else(|| ScmRepositoryError::NoSuchProvider {
                kind: repository.provider.clone(),
            })
    }

    /// Repository and provider for a configuration in one step
    pub fn resolve(
        &self,
        config: &ReleaseConfiguration,
    ) -> Result<(ScmRepository, Arc<dyn ScmProvider>), ScmRepositoryError> {
        let repository = self.configured_repository(config)?;
        let provider = self.provider(&repository)?;
        Ok((repository, provider))
    }
}
