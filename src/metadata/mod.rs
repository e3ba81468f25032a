//! Entry file discovery from the project's package.json

use crate::error::{PublishError, Result};
use crate::source::{AdditionalFiles, normalize_path};
use serde::Deserialize;
use std::path::Path;

/// Name of the project manifest inside the workspace
pub const PACKAGE_MANIFEST: &str = "package.json";

/// What to publish, as declared by the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Compiled entry file (`main` in package.json)
    pub entry_file: String,
    /// Extra files supplied through run configuration
    pub additional_files: AdditionalFiles,
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    main: Option<String>,
}

/// Read the entry file from package.json and attach the parsed additional files.
///
/// Fails with [`PublishError::MissingEntryFile`] when `main` is absent or empty.
pub fn read_manifest(workspace: &Path, additional_files: Option<&str>) -> Result<ManifestInfo> {
    let manifest_path = workspace.join(PACKAGE_MANIFEST);

    let manifest = std::fs::read_to_string(&manifest_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PublishError::FileNotFound {
                path: PACKAGE_MANIFEST.to_string(),
            }
        } else {
            PublishError::Io(e)
        }
    })?;

    let package: PackageJson = serde_json::from_str(&manifest)?;

    let entry_file = package
        .main
        .as_deref()
        .map(normalize_path)
        .transpose()?
        .filter(|m| !m.is_empty())
        .ok_or(PublishError::MissingEntryFile {
            manifest: manifest_path,
        })?;

    Ok(ManifestInfo {
        entry_file,
        additional_files: AdditionalFiles::parse(additional_files)?,
    })
}
