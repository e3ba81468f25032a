//! Run context: repository coordinates, triggering commit and release event.
//!
//! Built once at startup and passed by reference to every component.

use crate::error::{PublishError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Owner and name of the repository being published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoords {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoCoords {
    /// Parse `owner/name` notation
    pub fn parse(input: &str) -> Result<Self> {
        let coords = input
            .trim()
            .split_once('/')
            .map(|(owner, name)| (owner, name.trim_end_matches(".git")));

        match coords {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(PublishError::config(format!(
                "Invalid repository '{}'. Expected owner/name",
                input
            ))),
        }
    }
}

impl fmt::Display for RepoCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Release that triggered the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEvent {
    /// Tag name of the release (e.g. `v2.3.1`)
    pub tag_name: String,
    /// Whether the release is still a draft
    pub is_draft: bool,
}

/// Immutable parameters of one publish run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Repository to publish into
    pub repo: RepoCoords,
    /// Commit the release was cut from; parent of the compiled commit
    pub sha: String,
    /// The release being published
    pub release: ReleaseEvent,
    /// Checked-out working tree
    pub workspace: PathBuf,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    release: Option<ReleasePayload>,
    repository: Option<RepositoryPayload>,
}

#[derive(Debug, Deserialize)]
struct ReleasePayload {
    tag_name: String,
    #[serde(default)]
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    full_name: String,
}

/// Values parsed out of a webhook event payload
#[derive(Debug, Clone)]
pub struct EventInfo {
    /// The release section of the payload
    pub release: ReleaseEvent,
    /// `repository.full_name`, when present
    pub repository: Option<RepoCoords>,
}

impl EventInfo {
    /// Parse a release event payload
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: EventPayload = serde_json::from_str(json)?;

        let release = payload.release.ok_or_else(|| {
            PublishError::config("Event payload has no 'release' object")
        })?;

        let repository = payload
            .repository
            .map(|r| RepoCoords::parse(&r.full_name))
            .transpose()?;

        Ok(Self {
            release: ReleaseEvent {
                tag_name: release.tag_name,
                is_draft: release.draft,
            },
            repository,
        })
    }

    /// Read and parse the payload file GitHub writes for the run
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            PublishError::config(format!(
                "Failed to read event payload {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}
