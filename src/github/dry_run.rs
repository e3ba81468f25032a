//! Host that performs no remote writes

use super::{FileEntry, GitHost, GitRef, HostResult};
use crate::context::RepoCoords;
use std::sync::atomic::{AtomicU64, Ordering};

/// Logs each call instead of sending it.
///
/// Created objects get deterministic placeholder shas and no ref is ever
/// reported as existing, so a dry run always shows the alias being created.
#[derive(Debug, Default)]
pub struct DryRunHost {
    next_object: AtomicU64,
}

impl DryRunHost {
    /// Create a dry-run host
    pub fn new() -> Self {
        Self::default()
    }

    fn placeholder_sha(&self) -> String {
        let n = self.next_object.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{:040x}", n)
    }
}

impl GitHost for DryRunHost {
    async fn create_tree(&self, repo: &RepoCoords, entries: &[FileEntry]) -> HostResult<String> {
        log::info!("[dry-run] create tree in {} with {} entries", repo, entries.len());
        for entry in entries {
            log::info!("[dry-run]   {} ({} bytes)", entry.path, entry.content.len());
        }
        Ok(self.placeholder_sha())
    }

    async fn create_commit(
        &self,
        repo: &RepoCoords,
        message: &str,
        tree_sha: &str,
        parents: &[String],
    ) -> HostResult<String> {
        log::info!(
            "[dry-run] create commit in {}: \"{}\" tree={} parents={:?}",
            repo,
            message,
            tree_sha,
            parents
        );
        Ok(self.placeholder_sha())
    }

    async fn update_ref(
        &self,
        repo: &RepoCoords,
        ref_name: &str,
        sha: &str,
        force: bool,
    ) -> HostResult<()> {
        log::info!("[dry-run] update {} in {} -> {} (force: {})", ref_name, repo, sha, force);
        Ok(())
    }

    async fn create_ref(&self, repo: &RepoCoords, ref_path: &str, sha: &str) -> HostResult<()> {
        log::info!("[dry-run] create {} in {} -> {}", ref_path, repo, sha);
        Ok(())
    }

    async fn list_matching_refs(
        &self,
        repo: &RepoCoords,
        ref_prefix: &str,
    ) -> HostResult<Vec<GitRef>> {
        log::info!("[dry-run] list refs matching {} in {}", ref_prefix, repo);
        Ok(Vec::new())
    }
}
