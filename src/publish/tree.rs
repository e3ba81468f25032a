//! Tree composition: action manifest, entry file, additional files.

use crate::context::RunContext;
use crate::error::{PublishError, Result};
use crate::github::{FileEntry, GitHost};
use crate::metadata::ManifestInfo;
use crate::source;
use futures::future::try_join_all;
use std::collections::HashSet;

/// Ordered blob entries of the compiled tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSpec {
    entries: Vec<FileEntry>,
}

impl TreeSpec {
    /// Assemble entries in publish order: action manifest, entry file, then
    /// additional files as declared. Two entries for one path are rejected.
    pub fn build(
        action_file: FileEntry,
        entry_file: FileEntry,
        additional_files: Vec<FileEntry>,
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(additional_files.len() + 2);
        entries.push(action_file);
        entries.push(entry_file);
        entries.extend(additional_files);

        {
            let mut seen = HashSet::new();
            if let Some(dup) = entries.iter().find(|e| !seen.insert(e.path.as_str())) {
                return Err(PublishError::InvalidFileList {
                    reason: format!("'{}' would appear twice in the compiled tree", dup.path),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Entries in publish order
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Entry paths in publish order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }
}

/// Read every file of the tree from the workspace.
///
/// Additional files are read concurrently; all reads finish before the tree
/// is assembled.
pub async fn load_tree(
    ctx: &RunContext,
    action_file: &str,
    manifest: &ManifestInfo,
) -> Result<TreeSpec> {
    let workspace = ctx.workspace.as_path();

    let action = FileEntry::new(action_file, source::load(workspace, action_file).await?);
    let entry = FileEntry::new(
        manifest.entry_file.as_str(),
        source::load(workspace, &manifest.entry_file).await?,
    );

    let additional = try_join_all(manifest.additional_files.paths().iter().map(|path| async move {
        log::info!("File: {}", path);
        let content = source::load(workspace, path).await?;
        Ok::<_, PublishError>(FileEntry::new(path.as_str(), content))
    }))
    .await?;

    TreeSpec::build(action, entry, additional)
}

/// Submit the tree to the host and return its sha
pub async fn create_tree<H: GitHost>(host: &H, ctx: &RunContext, tree: &TreeSpec) -> Result<String> {
    Ok(host.create_tree(&ctx.repo, tree.entries()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandatory_entries_come_first() {
        let tree = TreeSpec::build(
            FileEntry::new("action.yml", "a"),
            FileEntry::new("dist/index.js", "b"),
            vec![FileEntry::new("README.md", "c"), FileEntry::new("LICENSE", "d")],
        )
        .unwrap();

        assert_eq!(
            tree.paths().collect::<Vec<_>>(),
            ["action.yml", "dist/index.js", "README.md", "LICENSE"]
        );
    }

    #[test]
    fn entry_file_equal_to_action_manifest_is_rejected() {
        let err = TreeSpec::build(
            FileEntry::new("action.yml", "a"),
            FileEntry::new("action.yml", "b"),
            Vec::new(),
        )
        .unwrap_err();

        assert!(matches!(err, PublishError::InvalidFileList { .. }));
    }
}
