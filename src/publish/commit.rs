//! Wrapping the compiled tree into a commit on top of the release commit.

use crate::context::RunContext;
use crate::error::Result;
use crate::github::GitHost;

/// Message of every compiled commit
pub const COMMIT_MESSAGE: &str = "Automatic compilation";

/// A commit created by this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Sha of the new commit
    pub sha: String,
    /// Tree the commit points at
    pub tree_sha: String,
    /// The commit that triggered the run; the only parent
    pub parent_sha: String,
    /// Always [`COMMIT_MESSAGE`]
    pub message: &'static str,
}

/// Create a single-parent commit of `tree_sha` on top of the triggering commit
pub async fn publish_commit<H: GitHost>(
    host: &H,
    ctx: &RunContext,
    tree_sha: &str,
) -> Result<CommitRecord> {
    let parents = [ctx.sha.clone()];
    let sha = host
        .create_commit(&ctx.repo, COMMIT_MESSAGE, tree_sha, &parents)
        .await?;

    Ok(CommitRecord {
        sha,
        tree_sha: tree_sha.to_string(),
        parent_sha: ctx.sha.clone(),
        message: COMMIT_MESSAGE,
    })
}
