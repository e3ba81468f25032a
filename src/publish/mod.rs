//! The compile-and-publish workflow.
//!
//! One run moves through [`PublishStage`]s in order, each stage a single
//! remote call:
//!
//! ```text
//! Start → TreeCreated → CommitCreated → ExactTagUpdated ─┬─ (draft) ─────────────────────────→ Done
//!                                                        └→ AliasResolved → AliasUpdated → Done
//! ```
//!
//! A failure stops the run where it happened. Earlier stages are not undone:
//! a created commit with an unmoved tag is a visible, acceptable outcome.

mod commit;
mod refs;
mod tags;
mod tree;

pub use commit::{COMMIT_MESSAGE, CommitRecord, publish_commit};
pub use refs::{RefAction, RefState, RefUpdate, update_ref};
pub use tags::{exact_ref, matches_ref, parse_tag_version, ref_exists, resolve_major_alias};
pub use tree::{TreeSpec, create_tree, load_tree};

use crate::cli::OutputManager;
use crate::context::RunContext;
use crate::error::Result;
use crate::github::GitHost;
use crate::metadata::read_manifest;
use std::fmt;

/// Canonical path of the action descriptor
pub const ACTION_FILE: &str = "action.yml";

/// Inputs of a publish run beyond the run context
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Path of the action descriptor inside the workspace
    pub action_file: String,
    /// Raw newline-delimited list of extra files, if configured
    pub additional_files: Option<String>,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            action_file: ACTION_FILE.to_string(),
            additional_files: None,
        }
    }
}

/// Last stage a run completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PublishStage {
    /// Nothing sent to the host yet
    Start,
    /// Compiled tree exists on the host
    TreeCreated,
    /// Compiled commit exists on the host
    CommitCreated,
    /// Release tag points at the compiled commit
    ExactTagUpdated,
    /// Major alias name derived and its existence checked
    AliasResolved,
    /// Major alias points at the compiled commit
    AliasUpdated,
    /// Run finished
    Done,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStage::Start => "start",
            PublishStage::TreeCreated => "tree created",
            PublishStage::CommitCreated => "commit created",
            PublishStage::ExactTagUpdated => "release tag updated",
            PublishStage::AliasResolved => "major tag resolved",
            PublishStage::AliasUpdated => "major tag updated",
            PublishStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Sha of the compiled tree
    pub tree_sha: String,
    /// The compiled commit
    pub commit: CommitRecord,
    /// The release tag update
    pub exact: RefUpdate,
    /// The major alias update; `None` for drafts
    pub alias: Option<RefUpdate>,
}

/// Runs the workflow against a host for one release
pub struct Publisher<'a, H> {
    host: &'a H,
    ctx: &'a RunContext,
    output: &'a OutputManager,
}

impl<'a, H: GitHost> Publisher<'a, H> {
    /// Create a publisher
    pub fn new(host: &'a H, ctx: &'a RunContext, output: &'a OutputManager) -> Self {
        Self { host, ctx, output }
    }

    /// Publish the compiled commit and move the release tags.
    ///
    /// On failure the last completed stage is logged before the error is
    /// returned.
    pub async fn publish(&self, options: &PublishOptions) -> Result<PublishOutcome> {
        let mut stage = PublishStage::Start;

        let result = self.run_stages(options, &mut stage).await;
        if let Err(e) = &result {
            log::error!("Publish failed after stage '{}': {}", stage, e);
            if stage > PublishStage::Start {
                self.output
                    .warn(&format!("Stopped after stage: {} (nothing was rolled back)", stage));
            }
        }
        result
    }

    async fn run_stages(
        &self,
        options: &PublishOptions,
        stage: &mut PublishStage,
    ) -> Result<PublishOutcome> {
        let ctx = self.ctx;

        // Local inputs are validated before anything is sent to the host
        let manifest = read_manifest(&ctx.workspace, options.additional_files.as_deref())?;
        manifest
            .additional_files
            .ensure_disjoint(&[options.action_file.as_str(), manifest.entry_file.as_str()])?;

        if !manifest.additional_files.is_empty() {
            log::info!(
                "Publishing {} additional file(s)",
                manifest.additional_files.len()
            );
        }
        let tree = load_tree(ctx, &options.action_file, &manifest).await?;

        self.output.info("Creating tree");
        let tree_sha = create_tree(self.host, ctx, &tree).await?;
        *stage = PublishStage::TreeCreated;
        self.output.success("Tree created");
        log::info!("Tree {} ({})", tree_sha, tree.paths().collect::<Vec<_>>().join(", "));

        self.output.info("Creating commit");
        let commit = publish_commit(self.host, ctx, &tree_sha).await?;
        *stage = PublishStage::CommitCreated;
        self.output.success("Commit created");
        log::info!("Commit {} (parent {})", commit.sha, commit.parent_sha);

        let tag_name = &ctx.release.tag_name;
        let exact_name = exact_ref(tag_name);
        self.output.info(&format!("Updating {}", exact_name));
        let exact = update_ref(self.host, ctx, &exact_name, &commit.sha, RefState::Present).await?;
        *stage = PublishStage::ExactTagUpdated;
        self.output.success(&format!("Updated {}", exact_name));

        if ctx.release.is_draft {
            log::info!("Draft release; leaving the major version tag alone");
            *stage = PublishStage::Done;
            return Ok(PublishOutcome {
                tree_sha,
                commit,
                exact,
                alias: None,
            });
        }

        let alias_name = resolve_major_alias(tag_name)?;
        self.output
            .info(&format!("Updating major version tag {}", alias_name));
        let alias_state = if ref_exists(self.host, ctx, &alias_name).await? {
            RefState::Present
        } else {
            RefState::Absent
        };
        *stage = PublishStage::AliasResolved;
        log::info!("{} is {:?}", alias_name, alias_state);

        let alias = update_ref(self.host, ctx, &alias_name, &commit.sha, alias_state).await?;
        *stage = PublishStage::AliasUpdated;
        self.output
            .success(&format!("Major version tag {} {}", alias_name, alias.action));

        *stage = PublishStage::Done;
        Ok(PublishOutcome {
            tree_sha,
            commit,
            exact,
            alias: Some(alias),
        })
    }
}
