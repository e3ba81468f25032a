//! Error types for the compile-and-publish workflow.
//!
//! Every failure aborts the run where it happens. Nothing is retried and
//! nothing already published is rolled back.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for publish operations
pub type Result<T> = std::result::Result<T, PublishError>;

/// Main error type for all publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    /// A declared file is absent from the working tree
    #[error("{path} does not exist.")]
    FileNotFound {
        /// Repository-relative path that was requested
        path: String,
    },

    /// The project manifest does not declare an entry file
    #[error("Property \"main\" does not exist in your `{}`.", .manifest.display())]
    MissingEntryFile {
        /// Path of the manifest that was read
        manifest: PathBuf,
    },

    /// The release tag is not a semantic version
    #[error("Tag '{tag}' is not a valid semantic version: {source}")]
    InvalidVersion {
        /// Tag name from the release event
        tag: String,
        /// Parsing error
        #[source]
        source: semver::Error,
    },

    /// A call to the version-control host failed
    #[error("Remote call failed: {0}")]
    Remote(#[from] RemoteCallError),

    /// The list of files to publish is malformed
    #[error("Invalid file list: {reason}")]
    InvalidFileList {
        /// Reason for the error
        reason: String,
    },

    /// Missing or inconsistent run configuration
    #[error("Configuration error: {reason}")]
    Config {
        /// Reason for the error
        reason: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single remote host operation
#[derive(Error, Debug)]
#[error("{operation} failed{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
pub struct RemoteCallError {
    /// Operation that failed (e.g. "create tree")
    pub operation: String,
    /// HTTP status, if the host answered at all
    pub status: Option<u16>,
    /// Response body or transport error message
    pub message: String,
}

impl RemoteCallError {
    /// Failure reported by the host with an HTTP status
    pub fn status(operation: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure before any response was received
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: None,
            message: message.into(),
        }
    }
}

impl PublishError {
    /// Shorthand for configuration errors
    pub fn config(reason: impl Into<String>) -> Self {
        PublishError::Config {
            reason: reason.into(),
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PublishError::FileNotFound { path } => vec![
                format!("Make sure '{}' is built and present before this step runs", path),
                "Check that the repository was checked out into GITHUB_WORKSPACE".to_string(),
            ],
            PublishError::MissingEntryFile { .. } => vec![
                "Add a \"main\" field pointing at the compiled entry file to package.json"
                    .to_string(),
            ],
            PublishError::InvalidVersion { tag, .. } => vec![
                format!("Tag '{}' was still moved; only the major tag was skipped", tag),
                "Name release tags like v1.2.3 so the major tag can be derived".to_string(),
            ],
            PublishError::Remote(RemoteCallError {
                status: Some(401 | 403),
                ..
            }) => vec![
                "Check that GITHUB_TOKEN is set and has contents: write permission".to_string(),
            ],
            PublishError::Remote(RemoteCallError {
                status: Some(422), ..
            }) => vec![
                "The ref may have been created concurrently; re-run the workflow".to_string(),
                "Verify the triggering commit exists on the remote".to_string(),
            ],
            PublishError::InvalidFileList { .. } => vec![
                "List each additional file once, one path per line".to_string(),
                "Do not repeat action.yml or the package.json entry file".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
