//! Remote git-data operations on the repository host.
//!
//! [`GitHost`] is the seam between the publish workflow and the host API.
//! [`GitHubClient`] talks to the GitHub REST API; [`DryRunHost`] performs no
//! writes and is used for `--dry-run`.

mod client;
mod dry_run;
mod types;

pub use client::{DEFAULT_API_URL, GitHubClient};
pub use dry_run::DryRunHost;
pub use types::{FileEntry, GitRef, REGULAR_FILE_MODE};

use crate::context::RepoCoords;
use crate::error::RemoteCallError;
use std::future::Future;

/// Result of a single host call
pub type HostResult<T> = std::result::Result<T, RemoteCallError>;

/// Git-data operations the publish workflow needs from the host
pub trait GitHost {
    /// Create a tree from blob entries and return its sha
    fn create_tree(
        &self,
        repo: &RepoCoords,
        entries: &[FileEntry],
    ) -> impl Future<Output = HostResult<String>> + Send;

    /// Create a commit and return its sha
    fn create_commit(
        &self,
        repo: &RepoCoords,
        message: &str,
        tree_sha: &str,
        parents: &[String],
    ) -> impl Future<Output = HostResult<String>> + Send;

    /// Point an existing ref (e.g. `tags/v2`) at `sha`
    fn update_ref(
        &self,
        repo: &RepoCoords,
        ref_name: &str,
        sha: &str,
        force: bool,
    ) -> impl Future<Output = HostResult<()>> + Send;

    /// Create a new ref; `ref_path` is fully qualified (e.g. `refs/tags/v2`)
    fn create_ref(
        &self,
        repo: &RepoCoords,
        ref_path: &str,
        sha: &str,
    ) -> impl Future<Output = HostResult<()>> + Send;

    /// List refs whose name starts with `ref_prefix` (e.g. `tags/v2`)
    fn list_matching_refs(
        &self,
        repo: &RepoCoords,
        ref_prefix: &str,
    ) -> impl Future<Output = HostResult<Vec<GitRef>>> + Send;
}
