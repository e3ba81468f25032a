//! Wire types shared by host implementations

use serde::{Deserialize, Serialize};

/// Git file mode for a regular, non-executable file
pub const REGULAR_FILE_MODE: &str = "100644";

/// A blob entry of a tree to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Repository-relative path
    pub path: String,
    /// Always [`REGULAR_FILE_MODE`]
    pub mode: &'static str,
    /// Object type, always `blob`
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Decoded file contents
    pub content: String,
}

impl FileEntry {
    /// Regular file entry with the given contents
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: REGULAR_FILE_MODE,
            kind: "blob",
            content: content.into(),
        }
    }
}

/// A ref as returned by the host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitRef {
    /// Fully qualified name, e.g. `refs/tags/v2`
    #[serde(rename = "ref")]
    pub ref_name: String,
}

impl GitRef {
    /// Ref with the given fully qualified name
    pub fn new(ref_name: impl Into<String>) -> Self {
        Self {
            ref_name: ref_name.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTreeRequest<'a> {
    pub tree: &'a [FileEntry],
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateCommitRequest<'a> {
    pub message: &'a str,
    pub tree: &'a str,
    pub parents: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateRefRequest<'a> {
    pub sha: &'a str,
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    pub ref_path: &'a str,
    pub sha: &'a str,
}

/// Any created git object; only the sha is used
#[derive(Debug, Deserialize)]
pub(crate) struct GitObject {
    pub sha: String,
}
