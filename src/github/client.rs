//! GitHub REST client for the git-data endpoints

use super::types::{
    CreateCommitRequest, CreateRefRequest, CreateTreeRequest, GitObject, UpdateRefRequest,
};
use super::{FileEntry, GitHost, GitRef, HostResult};
use crate::context::RepoCoords;
use crate::error::{PublishError, RemoteCallError, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

/// Default API root for github.com
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// Authenticated client for one GitHub API root
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    token: String,
}

impl GitHubClient {
    /// Create a client for `api_url` authenticating with `token`
    pub fn new(api_url: &str, token: impl Into<String>) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| PublishError::config(format!("Invalid API URL '{}': {}", api_url, e)))?;

        if api_url.cannot_be_a_base() {
            return Err(PublishError::config(format!(
                "Invalid API URL '{}': not a base URL",
                api_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| PublishError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url,
            token: token.into(),
        })
    }

    /// `{api}/repos/{owner}/{name}/git/{path...}`; `path` entries may contain `/`
    fn endpoint(&self, repo: &RepoCoords, path: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str(), "git"])
                .extend(path.iter().flat_map(|p| p.split('/')));
        }
        url
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> HostResult<Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| RemoteCallError::transport(operation, e.to_string()))?;

        let status = response.status();
        log::debug!("{} -> {}", operation, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteCallError::status(
                operation,
                status.as_u16(),
                error_message(&body),
            ));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> HostResult<T> {
        self.send(operation, request)
            .await?
            .json()
            .await
            .map_err(|e| RemoteCallError::transport(operation, format!("invalid response: {}", e)))
    }
}

/// GitHub error bodies are `{"message": ...}`; fall back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

impl GitHost for GitHubClient {
    async fn create_tree(&self, repo: &RepoCoords, entries: &[FileEntry]) -> HostResult<String> {
        let url = self.endpoint(repo, &["trees"]);
        log::debug!("POST {} ({} entries)", url, entries.len());

        let tree: GitObject = self
            .send_json(
                "create tree",
                self.http.post(url).json(&CreateTreeRequest { tree: entries }),
            )
            .await?;
        Ok(tree.sha)
    }

    async fn create_commit(
        &self,
        repo: &RepoCoords,
        message: &str,
        tree_sha: &str,
        parents: &[String],
    ) -> HostResult<String> {
        let url = self.endpoint(repo, &["commits"]);
        log::debug!("POST {}", url);

        let commit: GitObject = self
            .send_json(
                "create commit",
                self.http.post(url).json(&CreateCommitRequest {
                    message,
                    tree: tree_sha,
                    parents,
                }),
            )
            .await?;
        Ok(commit.sha)
    }

    async fn update_ref(
        &self,
        repo: &RepoCoords,
        ref_name: &str,
        sha: &str,
        force: bool,
    ) -> HostResult<()> {
        let url = self.endpoint(repo, &["refs", ref_name]);
        log::debug!("PATCH {} (force: {})", url, force);

        self.send(
            "update ref",
            self.http.patch(url).json(&UpdateRefRequest { sha, force }),
        )
        .await?;
        Ok(())
    }

    async fn create_ref(&self, repo: &RepoCoords, ref_path: &str, sha: &str) -> HostResult<()> {
        let url = self.endpoint(repo, &["refs"]);
        log::debug!("POST {} ({})", url, ref_path);

        self.send(
            "create ref",
            self.http.post(url).json(&CreateRefRequest { ref_path, sha }),
        )
        .await?;
        Ok(())
    }

    async fn list_matching_refs(
        &self,
        repo: &RepoCoords,
        ref_prefix: &str,
    ) -> HostResult<Vec<GitRef>> {
        let url = self.endpoint(repo, &["matching-refs", ref_prefix]);
        log::debug!("GET {}", url);

        self.send_json("list matching refs", self.http.get(url)).await
    }
}
