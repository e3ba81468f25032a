//! Moving refs to the compiled commit.

use crate::context::RunContext;
use crate::error::Result;
use crate::github::GitHost;
use std::fmt;

/// Whether a ref existed when it was last checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefState {
    /// No such ref; it will be created
    Absent,
    /// The ref exists; it will be force-updated
    Present,
}

/// What was done to a ref
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefAction {
    /// A new ref was created
    Created,
    /// An existing ref was force-moved
    ForceUpdated,
}

impl fmt::Display for RefAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefAction::Created => f.write_str("created"),
            RefAction::ForceUpdated => f.write_str("updated"),
        }
    }
}

/// A ref now pointing at the compiled commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    /// Short ref name, e.g. `tags/v2`
    pub ref_name: String,
    /// Commit the ref points at
    pub sha: String,
    /// Whether the ref was created or moved
    pub action: RefAction,
}

/// Point `ref_name` at `sha`.
///
/// `Present` refs are force-updated; `Absent` refs are created, which fails
/// if someone created the ref in the meantime.
pub async fn update_ref<H: GitHost>(
    host: &H,
    ctx: &RunContext,
    ref_name: &str,
    sha: &str,
    state: RefState,
) -> Result<RefUpdate> {
    let action = match state {
        RefState::Present => {
            host.update_ref(&ctx.repo, ref_name, sha, true).await?;
            RefAction::ForceUpdated
        }
        RefState::Absent => {
            host.create_ref(&ctx.repo, &format!("refs/{}", ref_name), sha)
                .await?;
            RefAction::Created
        }
    };

    Ok(RefUpdate {
        ref_name: ref_name.to_string(),
        sha: sha.to_string(),
        action,
    })
}
