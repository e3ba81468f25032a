//! Release tag and major-version alias resolution.

use crate::context::RunContext;
use crate::error::{PublishError, Result};
use crate::github::{GitHost, GitRef};
use semver::Version;

/// Ref name of the release tag itself, e.g. `tags/v2.3.1`
pub fn exact_ref(tag_name: &str) -> String {
    format!("tags/{}", tag_name)
}

/// Parse a release tag as a semantic version.
///
/// A leading `v` (or `=`) is accepted, as in `v2.3.1`.
pub fn parse_tag_version(tag_name: &str) -> Result<Version> {
    let trimmed = tag_name.trim();
    let version = trimmed
        .strip_prefix(['v', 'V', '='])
        .unwrap_or(trimmed);

    Version::parse(version).map_err(|source| PublishError::InvalidVersion {
        tag: tag_name.to_string(),
        source,
    })
}

/// Major-version alias of a release tag: `v2.3.1` → `tags/v2`
pub fn resolve_major_alias(tag_name: &str) -> Result<String> {
    let version = parse_tag_version(tag_name)?;
    Ok(format!("tags/v{}", version.major))
}

/// Whether `refs` contains exactly `ref_name`.
///
/// The host matches by prefix, so `tags/v1` also lists `refs/tags/v10`;
/// only the full ref path counts.
pub fn matches_ref(refs: &[GitRef], ref_name: &str) -> bool {
    refs.iter().any(|r| {
        r.ref_name
            .strip_prefix("refs/")
            .is_some_and(|name| name == ref_name)
    })
}

/// Ask the host whether `ref_name` currently exists
pub async fn ref_exists<H: GitHost>(host: &H, ctx: &RunContext, ref_name: &str) -> Result<bool> {
    let refs = host.list_matching_refs(&ctx.repo, ref_name).await?;
    log::debug!("{} ref(s) match {}", refs.len(), ref_name);
    Ok(matches_ref(&refs, ref_name))
}
