//! # Action Compile Publish
//!
//! Publishes the compiled form of a JavaScript action whenever a release is
//! cut.
//!
//! On a `release` event the crate commits `action.yml`, the entry file named
//! by `main` in `package.json` and any configured additional files as a new
//! commit whose only parent is the release commit. The release tag is then
//! force-moved to that commit and, for non-draft releases, the major version
//! tag (`v2` for `v2.3.1`) is created or force-moved as well, so consumers of
//! `uses: owner/action@v2` always get the latest compiled build.
//!
//! ## Usage
//!
//! ```bash
//! action_compile_publish                      # inside a release workflow
//! action_compile_publish --tag v1.2.0 --dry-run --repository o/r --sha <sha>
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod context;
pub mod error;
pub mod github;
pub mod metadata;
pub mod publish;
pub mod source;

// Re-export main types for public API
pub use cli::Args;
pub use context::{ReleaseEvent, RepoCoords, RunContext};
pub use error::{PublishError, RemoteCallError, Result};
pub use github::{DryRunHost, FileEntry, GitHost, GitHubClient, GitRef};
pub use metadata::{ManifestInfo, read_manifest};
pub use publish::{PublishOptions, PublishOutcome, PublishStage, Publisher};
pub use source::AdditionalFiles;
