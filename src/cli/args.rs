//! Command line argument parsing and validation.
//!
//! Every option falls back to the variable GitHub Actions sets for the job,
//! so inside a workflow the binary needs no arguments at all.

use crate::context::{EventInfo, ReleaseEvent, RepoCoords, RunContext};
use crate::error::{PublishError, Result};
use crate::github::GitHubClient;
use crate::publish::{ACTION_FILE, PublishOptions};
use clap::Parser;
use std::path::PathBuf;

/// Publish a compiled commit for a release and move its version tags
#[derive(Parser, Debug, Clone)]
#[command(
    name = "action_compile_publish",
    version,
    about = "Publish a compiled commit for a release and move its version tags",
    long_about = "Commits action.yml, the package.json entry file and any additional files as a
single-parent commit on top of the release commit, then points the release tag and
its major version tag (e.g. v2 for v2.3.1) at it. Draft releases only move the
release tag.

Usage inside a workflow triggered by `release`:
  action_compile_publish

Usage outside of Actions:
  action_compile_publish --repository octo-org/hello-action --sha <commit> --tag v1.2.0 --dry-run"
)]
pub struct Args {
    /// Checked-out repository containing package.json and action.yml
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// Path to the JSON payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Name of the triggering event; must be `release` when set
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: Option<String>,

    /// Repository in owner/name form (defaults to the event payload's)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Commit the release was cut from
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: Option<String>,

    /// Token used to call the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API root
    #[arg(long, env = "GITHUB_API_URL", default_value = crate::github::DEFAULT_API_URL)]
    pub api_url: String,

    /// Newline-delimited list of extra files to include
    #[arg(long, env = "INPUT_ADDITIONAL_FILES")]
    pub additional_files: Option<String>,

    /// Path of the action descriptor inside the workspace
    #[arg(long, default_value = ACTION_FILE)]
    pub action_file: String,

    /// Release tag to publish (overrides the event payload)
    #[arg(long)]
    pub tag: Option<String>,

    /// Treat the release as a draft (overrides the event payload)
    #[arg(long)]
    pub draft: bool,

    /// Show what would be sent without changing anything on GitHub
    #[arg(long)]
    pub dry_run: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(event) = self.event_name.as_deref()
            && event != "release"
        {
            return Err(PublishError::config(format!(
                "This step only runs on release events, got '{}'",
                event
            )));
        }

        if !self.dry_run && self.token.as_deref().is_none_or(str::is_empty) {
            return Err(PublishError::config(
                "GitHub token not provided. Set GITHUB_TOKEN or use --token",
            ));
        }

        if self.event_path.is_none() && self.tag.is_none() {
            return Err(PublishError::config(
                "No release event: set GITHUB_EVENT_PATH or pass --tag",
            ));
        }

        Ok(())
    }

    /// Build the immutable run context from arguments and the event payload
    pub fn run_context(&self) -> Result<RunContext> {
        let event = self
            .event_path
            .as_deref()
            .map(EventInfo::load)
            .transpose()?;

        let release = match (&self.tag, &event) {
            (Some(tag), _) => ReleaseEvent {
                tag_name: tag.clone(),
                is_draft: self.draft || event.as_ref().is_some_and(|e| e.release.is_draft),
            },
            (None, Some(event)) => ReleaseEvent {
                is_draft: self.draft || event.release.is_draft,
                ..event.release.clone()
            },
            (None, None) => {
                return Err(PublishError::config("No release tag available"));
            }
        };

        let repo = match self.repository.as_deref() {
            Some(repository) => RepoCoords::parse(repository)?,
            None => event
                .as_ref()
                .and_then(|e| e.repository.clone())
                .ok_or_else(|| {
                    PublishError::config("Repository unknown. Set GITHUB_REPOSITORY or use --repository")
                })?,
        };

        let sha = self
            .sha
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PublishError::config("Triggering commit unknown. Set GITHUB_SHA or use --sha"))?;

        Ok(RunContext {
            repo,
            sha,
            release,
            workspace: self.workspace.clone(),
        })
    }

    /// Workflow inputs beyond the run context
    pub fn publish_options(&self) -> PublishOptions {
        PublishOptions {
            action_file: self.action_file.clone(),
            additional_files: self.additional_files.clone(),
        }
    }

    /// Client for the configured API root
    pub fn github_client(&self) -> Result<GitHubClient> {
        let token = self.token.clone().unwrap_or_default();
        GitHubClient::new(&self.api_url, token)
    }
}
