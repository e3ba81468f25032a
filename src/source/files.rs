//! Parsing of the newline-delimited `additional_files` input.

use crate::error::{PublishError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Validated, ordered list of extra repository paths to publish
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdditionalFiles(Vec<String>);

impl AdditionalFiles {
    /// Split the raw input into paths.
    ///
    /// Blank lines and surrounding whitespace are ignored, so an absent or
    /// empty input yields an empty list. Each path is normalized with
    /// `normalize_path`; a path listed twice after normalization is rejected.
    pub fn parse(input: Option<&str>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut paths = Vec::new();

        for line in input.unwrap_or_default().lines() {
            let raw = line.trim();
            if raw.is_empty() {
                continue;
            }

            let path = normalize_path(raw)?;
            if path.is_empty() {
                return Err(PublishError::InvalidFileList {
                    reason: format!("'{}' does not name a file", raw),
                });
            }

            if !seen.insert(path.clone()) {
                return Err(PublishError::InvalidFileList {
                    reason: format!("'{}' is listed more than once", path),
                });
            }
            paths.push(path);
        }

        Ok(Self(paths))
    }

    /// Reject paths that are already published as mandatory entries
    pub fn ensure_disjoint(&self, reserved: &[&str]) -> Result<()> {
        match self.0.iter().find(|p| reserved.contains(&p.as_str())) {
            Some(path) => Err(PublishError::InvalidFileList {
                reason: format!("'{}' is already included in the compiled tree", path),
            }),
            None => Ok(()),
        }
    }

    /// Paths in declaration order
    pub fn paths(&self) -> &[String] {
        &self.0
    }

    /// Whether no additional files were declared
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of declared paths
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Canonical repository-relative form of `raw`.
///
/// Empty and `.` segments are dropped, so `./dist//index.js` becomes
/// `dist/index.js`. Absolute paths and `..` segments leave the workspace and
/// are rejected. An input made only of `.` segments yields an empty string.
pub(crate) fn normalize_path(raw: &str) -> Result<String> {
    let raw = raw.trim();

    if raw.starts_with('/') || raw.starts_with('\\') || Path::new(raw).is_absolute() {
        return Err(PublishError::InvalidFileList {
            reason: format!("'{}' is absolute; paths must be relative to the workspace", raw),
        });
    }

    let mut segments = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(PublishError::InvalidFileList {
                    reason: format!("'{}' points outside the workspace", raw),
                });
            }
            name => segments.push(name),
        }
    }

    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_blank_input_is_empty() {
        assert!(AdditionalFiles::parse(None).unwrap().is_empty());
        assert!(AdditionalFiles::parse(Some("")).unwrap().is_empty());
        assert!(AdditionalFiles::parse(Some("\n  \n")).unwrap().is_empty());
    }

    #[test]
    fn splits_and_trims_lines_in_order() {
        let files =
            AdditionalFiles::parse(Some("dist/licenses.txt\r\n  README.md \n\ndist/sourcemap.js\n"))
                .unwrap();
        assert_eq!(
            files.paths(),
            ["dist/licenses.txt", "README.md", "dist/sourcemap.js"]
        );
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let err = AdditionalFiles::parse(Some("README.md\nLICENSE\nREADME.md")).unwrap_err();
        assert!(err.to_string().contains("'README.md' is listed more than once"));
    }

    #[test]
    fn paths_are_normalized_before_duplicate_check() {
        let files = AdditionalFiles::parse(Some("./README.md\ndist/./licenses.txt\ndocs//usage.md"))
            .unwrap();
        assert_eq!(files.paths(), ["README.md", "dist/licenses.txt", "docs/usage.md"]);

        let err = AdditionalFiles::parse(Some("README.md\n./README.md")).unwrap_err();
        assert!(err.to_string().contains("'README.md' is listed more than once"));
    }

    #[test]
    fn paths_leaving_the_workspace_are_rejected() {
        for input in ["/etc/passwd", "../secrets.txt", "dist/../../outside", "."] {
            assert!(
                matches!(
                    AdditionalFiles::parse(Some(input)),
                    Err(PublishError::InvalidFileList { .. })
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn dot_slash_mandatory_entries_collide() {
        let files = AdditionalFiles::parse(Some("./action.yml")).unwrap();
        assert!(files.ensure_disjoint(&["action.yml", "dist/index.js"]).is_err());
    }

    #[test]
    fn collisions_with_mandatory_entries_are_rejected() {
        let files = AdditionalFiles::parse(Some("README.md\naction.yml")).unwrap();
        assert!(files.ensure_disjoint(&["action.yml", "dist/index.js"]).is_err());

        let files = AdditionalFiles::parse(Some("README.md")).unwrap();
        assert!(files.ensure_disjoint(&["action.yml", "dist/index.js"]).is_ok());
    }
}
