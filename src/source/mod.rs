//! Reading files to publish from the checked-out working tree.

mod files;

pub use files::AdditionalFiles;
pub(crate) use files::normalize_path;

use crate::error::{PublishError, Result};
use std::path::Path;

/// Read a repository-relative text file from the workspace.
///
/// Fails with [`PublishError::FileNotFound`] when the file is absent. Only
/// UTF-8 text is supported.
pub async fn load(workspace: &Path, relative_path: &str) -> Result<String> {
    let full_path = workspace.join(relative_path);

    if !tokio::fs::try_exists(&full_path).await? {
        return Err(PublishError::FileNotFound {
            path: relative_path.to_string(),
        });
    }

    log::debug!("Reading {}", full_path.display());
    Ok(tokio::fs::read_to_string(&full_path).await?)
}
