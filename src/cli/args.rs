//! Command line argument parsing and validation.

use crate::config::{DEFAULT_POM_FILE_NAME, DEFAULT_PREPARATION_GOALS, ProjectKey, ReleaseConfiguration};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Resumable release orchestration for Maven projects
#[derive(Parser, Debug)]
#[command(
    name = "release_conductor",
    version,
    about = "Resumable release orchestration for Maven projects",
    long_about = "Prepare a release by running an ordered, checkpointed sequence of phases,
then perform it by building a fresh checkout of the release tag.

Usage:
  release_conductor prepare -g org.example -a widget --scm-url scm:git:https://host/widget.git \\
      --release-version 1.0 --development-version 1.1-SNAPSHOT
  release_conductor perform -g org.example -a widget
  release_conductor status -g org.example -a widget
  release_conductor clean -g org.example -a widget"
)]
pub struct Args {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Directory holding release records (defaults to the project directory)
    #[arg(long, global = true, env = "RELEASE_STATE_DIR", value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Show detailed output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Project identity shared by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project group id
    #[arg(short = 'g', long, value_name = "GROUP")]
    pub group_id: String,

    /// Project artifact id
    #[arg(short = 'a', long, value_name = "ARTIFACT")]
    pub artifact_id: String,
}

impl ProjectArgs {
    /// Store key of the project
    pub fn key(&self) -> ProjectKey {
        ProjectKey::new(self.group_id.clone(), self.artifact_id.clone())
    }
}

/// SCM credentials; never written to the release record
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// SCM user name
    #[arg(long, env = "RELEASE_SCM_USERNAME", value_name = "USER")]
    pub scm_username: Option<String>,

    /// SCM password
    #[arg(long, env = "RELEASE_SCM_PASSWORD", hide_env_values = true, value_name = "PASSWORD")]
    pub scm_password: Option<String>,
}

/// Release subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prepare a release, resuming an interrupted preparation by default
    Prepare {
        /// Project identity
        #[command(flatten)]
        project: ProjectArgs,

        /// SCM connection URL, e.g. scm:git:https://host/repo.git
        #[arg(long, value_name = "URL")]
        scm_url: Option<String>,

        /// Version to release
        #[arg(long, value_name = "VERSION")]
        release_version: Option<String>,

        /// Version to continue development with
        #[arg(long, value_name = "VERSION")]
        development_version: Option<String>,

        /// Tag to record the release under (defaults to <artifact>-<release version>)
        #[arg(long, value_name = "TAG")]
        tag: Option<String>,

        /// Extra arguments passed to every build
        #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
        arguments: Option<String>,

        /// POM file name relative to the project directory
        #[arg(long, default_value = DEFAULT_POM_FILE_NAME, value_name = "FILE")]
        pom_file: String,

        /// Goals run to verify the release before committing
        #[arg(long, default_value = DEFAULT_PREPARATION_GOALS, value_name = "GOALS")]
        preparation_goals: String,

        /// Allow builds to prompt
        #[arg(long)]
        interactive: bool,

        /// Start over, ignoring any stored progress
        #[arg(long)]
        no_resume: bool,

        /// Simulate every phase without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Push commits and the tag as they are created
        #[arg(long)]
        push: bool,

        /// Record that perform should not add -DperformRelease=true
        #[arg(long)]
        no_release_profile: bool,

        /// SCM credentials
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Build and deploy a prepared release from a fresh checkout of its tag
    Perform {
        /// Project identity
        #[command(flatten)]
        project: ProjectArgs,

        /// Checkout directory (defaults to <working-dir>/target/checkout)
        #[arg(long, value_name = "DIR")]
        checkout_dir: Option<PathBuf>,

        /// Goals run in the checkout
        #[arg(long, default_value = "deploy", value_name = "GOALS")]
        goals: String,

        /// Do not add -DperformRelease=true, whatever prepare recorded
        #[arg(long)]
        no_release_profile: bool,

        /// SCM credentials
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Remove the release record and any files left by preparation
    Clean {
        /// Project identity
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Show how far a release has progressed
    Status {
        /// Project identity
        #[command(flatten)]
        project: ProjectArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    /// Subcommand name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Prepare { .. } => "prepare",
            Command::Perform { .. } => "perform",
            Command::Clean { .. } => "clean",
            Command::Status { .. } => "status",
        }
    }

    /// Project the subcommand operates on
    pub fn project(&self) -> &ProjectArgs {
        match self {
            Command::Prepare { project, .. }
            | Command::Perform { project, .. }
            | Command::Clean { project }
            | Command::Status { project, .. } => project,
        }
    }

    /// Release configuration requested on the command line.
    ///
    /// Only `prepare` carries release parameters; the other subcommands yield
    /// a bare configuration identifying the project (plus credentials).
    pub fn requested_configuration(&self, working_dir: &Path) -> ReleaseConfiguration {
        let project = self.project();
        let mut config = ReleaseConfiguration::new(&project.group_id, &project.artifact_id)
            .with_working_directory(working_dir);

        match self {
            Command::Prepare {
                scm_url,
                release_version,
                development_version,
                tag,
                arguments,
                pom_file,
                preparation_goals,
                interactive,
                no_release_profile,
                credentials,
                ..
            } => {
                config.scm_connection_url = scm_url.clone();
                config.release_version = release_version.clone();
                config.development_version = development_version.clone();
                config.release_label = tag.clone();
                config.additional_arguments = arguments.clone();
                config = config
                    .with_pom_file_name(pom_file.as_str())
                    .with_preparation_goals(preparation_goals.as_str())
                    .with_interactive(*interactive)
                    .with_use_release_profile(!*no_release_profile);
                credentials.apply(&mut config);
            }
            Command::Perform { credentials, .. } => credentials.apply(&mut config),
            Command::Clean { .. } | Command::Status { .. } => {}
        }

        config
    }
}

impl CredentialArgs {
    fn apply(&self, config: &mut ReleaseConfiguration) {
        config.scm_username = self.scm_username.clone();
        config.scm_password = self.scm_password.clone();
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        let project = self.command.project();
        if project.group_id.trim().is_empty() {
            return Err("Group id must not be empty".to_string());
        }
        if project.artifact_id.trim().is_empty() {
            return Err("Artifact id must not be empty".to_string());
        }

        if let Command::Perform { goals, .. } = &self.command
            && goals.trim().is_empty()
        {
            return Err("At least one goal is required for perform".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Project directory
    pub working_dir: PathBuf,
    /// Directory holding release records
    pub state_dir: PathBuf,
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Runtime configuration rooted at `working_dir`
    pub fn new(working_dir: PathBuf, state_dir: Option<PathBuf>, verbose: bool, quiet: bool) -> Self {
        let state_dir = state_dir.unwrap_or_else(|| working_dir.clone());
        Self {
            working_dir,
            state_dir,
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }
}
