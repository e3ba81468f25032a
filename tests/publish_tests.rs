//! Publish workflow scenarios against a recording host.

use action_compile_publish::cli::OutputManager;
use action_compile_publish::error::{PublishError, RemoteCallError};
use action_compile_publish::github::{FileEntry, GitHost, GitRef, HostResult};
use action_compile_publish::publish::{
    COMMIT_MESSAGE, PublishOptions, PublishOutcome, Publisher, RefAction,
};
use action_compile_publish::{ReleaseEvent, RepoCoords, RunContext};
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

const RELEASE_SHA: &str = "1111111111111111111111111111111111111111";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    CreateTree(Vec<String>),
    CreateCommit {
        message: String,
        tree: String,
        parents: Vec<String>,
    },
    UpdateRef {
        ref_name: String,
        sha: String,
        force: bool,
    },
    CreateRef {
        ref_path: String,
        sha: String,
    },
    ListMatchingRefs(String),
}

/// Records every call; refs in `existing_refs` are reported by prefix like GitHub does
#[derive(Default)]
struct RecordingHost {
    calls: Mutex<Vec<Call>>,
    trees: Mutex<Vec<Vec<FileEntry>>>,
    existing_refs: Vec<String>,
    fail_operation: Option<&'static str>,
}

impl RecordingHost {
    fn with_refs(refs: &[&str]) -> Self {
        Self {
            existing_refs: refs.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    fn failing(operation: &'static str) -> Self {
        Self {
            fail_operation: Some(operation),
            ..Self::default()
        }
    }

    fn record(&self, operation: &str, call: Call) -> HostResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_operation == Some(operation) {
            return Err(RemoteCallError::status(operation, 422, "Validation Failed"));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl GitHost for RecordingHost {
    async fn create_tree(&self, _repo: &RepoCoords, entries: &[FileEntry]) -> HostResult<String> {
        self.trees.lock().unwrap().push(entries.to_vec());
        self.record(
            "create tree",
            Call::CreateTree(entries.iter().map(|e| e.path.clone()).collect()),
        )?;
        Ok("tree-sha".to_string())
    }

    async fn create_commit(
        &self,
        _repo: &RepoCoords,
        message: &str,
        tree_sha: &str,
        parents: &[String],
    ) -> HostResult<String> {
        self.record(
            "create commit",
            Call::CreateCommit {
                message: message.to_string(),
                tree: tree_sha.to_string(),
                parents: parents.to_vec(),
            },
        )?;
        Ok("commit-sha".to_string())
    }

    async fn update_ref(
        &self,
        _repo: &RepoCoords,
        ref_name: &str,
        sha: &str,
        force: bool,
    ) -> HostResult<()> {
        self.record(
            "update ref",
            Call::UpdateRef {
                ref_name: ref_name.to_string(),
                sha: sha.to_string(),
                force,
            },
        )
    }

    async fn create_ref(&self, _repo: &RepoCoords, ref_path: &str, sha: &str) -> HostResult<()> {
        self.record(
            "create ref",
            Call::CreateRef {
                ref_path: ref_path.to_string(),
                sha: sha.to_string(),
            },
        )
    }

    async fn list_matching_refs(
        &self,
        _repo: &RepoCoords,
        ref_prefix: &str,
    ) -> HostResult<Vec<GitRef>> {
        self.record("list matching refs", Call::ListMatchingRefs(ref_prefix.to_string()))?;
        let prefix = format!("refs/{}", ref_prefix);
        Ok(self
            .existing_refs
            .iter()
            .filter(|r| r.starts_with(&prefix))
            .map(|r| GitRef::new(r.as_str()))
            .collect())
    }
}

fn write(dir: &Path, path: &str, content: &str) {
    let full = dir.join(path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(full, content).unwrap();
}

fn action_workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "package.json", r#"{ "name": "hello-action", "main": "dist/index.js" }"#);
    write(dir.path(), "action.yml", "name: hello\nruns:\n  using: node20\n  main: dist/index.js\n");
    write(dir.path(), "dist/index.js", "console.log('hello');\n");
    write(dir.path(), "README.md", "# hello\n");
    write(dir.path(), "LICENSE", "MIT\n");
    dir
}

fn context(workspace: &TempDir, tag: &str, draft: bool) -> RunContext {
    RunContext {
        repo: RepoCoords::parse("octo-org/hello-action").unwrap(),
        sha: RELEASE_SHA.to_string(),
        release: ReleaseEvent {
            tag_name: tag.to_string(),
            is_draft: draft,
        },
        workspace: workspace.path().to_path_buf(),
    }
}

async fn publish(
    host: &RecordingHost,
    ctx: &RunContext,
    options: &PublishOptions,
) -> action_compile_publish::Result<PublishOutcome> {
    let output = OutputManager::new(true);
    Publisher::new(host, ctx, &output).publish(options).await
}

fn leading_calls(tag: &str) -> Vec<Call> {
    vec![
        Call::CreateTree(vec!["action.yml".to_string(), "dist/index.js".to_string()]),
        Call::CreateCommit {
            message: COMMIT_MESSAGE.to_string(),
            tree: "tree-sha".to_string(),
            parents: vec![RELEASE_SHA.to_string()],
        },
        Call::UpdateRef {
            ref_name: format!("tags/{}", tag),
            sha: "commit-sha".to_string(),
            force: true,
        },
    ]
}

#[tokio::test]
async fn new_major_version_creates_alias() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v3.0.0", false);
    let host = RecordingHost::default();

    let outcome = publish(&host, &ctx, &PublishOptions::default()).await.unwrap();

    let mut expected = leading_calls("v3.0.0");
    expected.push(Call::ListMatchingRefs("tags/v3".to_string()));
    expected.push(Call::CreateRef {
        ref_path: "refs/tags/v3".to_string(),
        sha: "commit-sha".to_string(),
    });
    assert_eq!(host.calls(), expected);

    let alias = outcome.alias.unwrap();
    assert_eq!(alias.ref_name, "tags/v3");
    assert_eq!(alias.action, RefAction::Created);
    assert_eq!(outcome.exact.action, RefAction::ForceUpdated);
    assert_eq!(outcome.commit.parent_sha, RELEASE_SHA);
}

#[tokio::test]
async fn existing_major_version_is_force_updated() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v3.0.1", false);
    let host = RecordingHost::with_refs(&["refs/tags/v3", "refs/tags/v3.0.0", "refs/tags/v30"]);

    let outcome = publish(&host, &ctx, &PublishOptions::default()).await.unwrap();

    let mut expected = leading_calls("v3.0.1");
    expected.push(Call::ListMatchingRefs("tags/v3".to_string()));
    expected.push(Call::UpdateRef {
        ref_name: "tags/v3".to_string(),
        sha: "commit-sha".to_string(),
        force: true,
    });
    assert_eq!(host.calls(), expected);
    assert_eq!(outcome.alias.unwrap().action, RefAction::ForceUpdated);
}

#[tokio::test]
async fn prefix_sharing_ref_does_not_count_as_alias() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v1.4.0", false);
    let host = RecordingHost::with_refs(&["refs/tags/v10", "refs/tags/v1.3.0"]);

    publish(&host, &ctx, &PublishOptions::default()).await.unwrap();

    assert_eq!(
        host.calls().last(),
        Some(&Call::CreateRef {
            ref_path: "refs/tags/v1".to_string(),
            sha: "commit-sha".to_string(),
        })
    );
}

#[tokio::test]
async fn draft_release_only_moves_release_tag() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v4.0.0", true);
    let host = RecordingHost::default();

    let outcome = publish(&host, &ctx, &PublishOptions::default()).await.unwrap();

    assert_eq!(host.calls(), leading_calls("v4.0.0"));
    assert!(outcome.alias.is_none());
}

#[tokio::test]
async fn draft_with_non_semver_tag_succeeds() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "nightly", true);
    let host = RecordingHost::default();

    publish(&host, &ctx, &PublishOptions::default()).await.unwrap();
    assert_eq!(host.calls(), leading_calls("nightly"));
}

#[tokio::test]
async fn invalid_version_fails_after_release_tag_moved() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "latest", false);
    let host = RecordingHost::default();

    let err = publish(&host, &ctx, &PublishOptions::default()).await.unwrap_err();

    assert!(matches!(err, PublishError::InvalidVersion { .. }));
    assert_eq!(host.calls(), leading_calls("latest"));
}

#[tokio::test]
async fn missing_main_fails_before_any_remote_call() {
    let workspace = action_workspace();
    write(workspace.path(), "package.json", r#"{ "name": "hello-action" }"#);
    let ctx = context(&workspace, "v1.0.0", false);
    let host = RecordingHost::default();

    let err = publish(&host, &ctx, &PublishOptions::default()).await.unwrap_err();

    assert!(matches!(err, PublishError::MissingEntryFile { .. }));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn missing_entry_file_fails_before_any_remote_call() {
    let workspace = action_workspace();
    std::fs::remove_file(workspace.path().join("dist/index.js")).unwrap();
    let ctx = context(&workspace, "v1.0.0", false);
    let host = RecordingHost::default();

    let err = publish(&host, &ctx, &PublishOptions::default()).await.unwrap_err();

    assert!(matches!(err, PublishError::FileNotFound { ref path } if path == "dist/index.js"));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn additional_files_follow_mandatory_entries_in_order() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v1.0.0", true);
    let host = RecordingHost::default();
    let options = PublishOptions {
        additional_files: Some("LICENSE\nREADME.md\n".to_string()),
        ..PublishOptions::default()
    };

    publish(&host, &ctx, &options).await.unwrap();

    let trees = host.trees.lock().unwrap();
    let tree = &trees[0];
    let paths: Vec<_> = tree.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["action.yml", "dist/index.js", "LICENSE", "README.md"]);
    assert_eq!(tree[2].content, "MIT\n");
    assert!(tree.iter().all(|e| e.mode == "100644"));
}

#[tokio::test]
async fn missing_additional_file_fails_before_any_remote_call() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v1.0.0", false);
    let host = RecordingHost::default();
    let options = PublishOptions {
        additional_files: Some("README.md\ndist/licenses.txt".to_string()),
        ..PublishOptions::default()
    };

    let err = publish(&host, &ctx, &options).await.unwrap_err();

    assert!(matches!(err, PublishError::FileNotFound { ref path } if path == "dist/licenses.txt"));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn duplicate_paths_are_rejected_before_any_remote_call() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v1.0.0", false);

    for list in ["README.md\nREADME.md", "dist/index.js", "action.yml"] {
        let host = RecordingHost::default();
        let options = PublishOptions {
            additional_files: Some(list.to_string()),
            ..PublishOptions::default()
        };

        let err = publish(&host, &ctx, &options).await.unwrap_err();
        assert!(
            matches!(err, PublishError::InvalidFileList { .. }),
            "{list:?} should be rejected"
        );
        assert!(host.calls().is_empty());
    }
}

#[tokio::test]
async fn dot_slash_and_escaping_paths_are_rejected_before_any_remote_call() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v1.0.0", false);

    for list in [
        "./action.yml",
        "./dist/index.js",
        "README.md\n./README.md",
        "/etc/passwd",
        "../outside.txt",
    ] {
        let host = RecordingHost::default();
        let options = PublishOptions {
            additional_files: Some(list.to_string()),
            ..PublishOptions::default()
        };

        let err = publish(&host, &ctx, &options).await.unwrap_err();
        assert!(
            matches!(err, PublishError::InvalidFileList { .. }),
            "{list:?} should be rejected"
        );
        assert!(host.calls().is_empty());
    }
}

#[tokio::test]
async fn remote_failure_stops_the_run() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v2.0.0", false);
    let host = RecordingHost::failing("create commit");

    let err = publish(&host, &ctx, &PublishOptions::default()).await.unwrap_err();

    match err {
        PublishError::Remote(remote) => {
            assert_eq!(remote.operation, "create commit");
            assert_eq!(remote.status, Some(422));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(host.calls().len(), 2);
}

#[tokio::test]
async fn alias_creation_race_is_surfaced() {
    let workspace = action_workspace();
    let ctx = context(&workspace, "v5.0.0", false);
    let host = RecordingHost::failing("create ref");

    let err = publish(&host, &ctx, &PublishOptions::default()).await.unwrap_err();

    assert!(matches!(err, PublishError::Remote(_)));
    assert_eq!(host.calls().len(), 5);
}
