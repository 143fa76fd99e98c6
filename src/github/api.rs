//! GitHub REST and GraphQL implementation of the forge collaborators
//!
//! Endpoints:
//! - GET /search/code
//! - GET /repos/{owner}/{repo}
//! - GET /search/issues
//! - GET /repos/{owner}/{repo}/pulls/{number}
//! - POST /graphql (createPullRequest)

use super::{
    group_by_repository, manifest_dirs_from_paths, CodeSearchHit, ForgeClient, HttpClient,
    NewPullRequest, PullRequestSummary, RepositoryMetadata,
};
use crate::domain::{PackageManagerKind, RepositoryIdentity, RepositoryTarget};
use crate::error::ForgeError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Results per search page; pagination beyond the first page is not followed
const SEARCH_PAGE_SIZE: &str = "100";

const CREATE_PULL_REQUEST_MUTATION: &str = r#"
mutation createPr(
  $branchName: String!,
  $id: ID!,
  $commitMessage: String!,
  $defaultBranch: String!,
  $body: String!
) {
  createPullRequest(input: {
    baseRefName: $defaultBranch,
    headRefName: $branchName,
    title: $commitMessage,
    repositoryId: $id,
    body: $body
  }) {
    pullRequest {
      url
    }
  }
}
"#;

/// Code search response
#[derive(Debug, Deserialize)]
struct CodeSearchResponse {
    #[serde(default)]
    items: Vec<CodeSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CodeSearchItem {
    path: String,
    repository: SearchRepository,
}

#[derive(Debug, Deserialize)]
struct SearchRepository {
    id: u64,
    name: String,
    html_url: String,
    node_id: String,
}

/// Repository response (only the fields used)
#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    default_branch: String,
    #[serde(default)]
    topics: Vec<String>,
}

/// Issue search response
#[derive(Debug, Deserialize)]
struct IssueSearchResponse {
    #[serde(default)]
    items: Vec<PullRequestSummary>,
}

/// Pull request response (only the head ref)
#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    head: PullRequestHead,
}

#[derive(Debug, Deserialize)]
struct PullRequestHead {
    #[serde(rename = "ref")]
    git_ref: String,
}

#[derive(Debug, Deserialize)]
struct CreatePullRequestData {
    #[serde(rename = "createPullRequest")]
    create_pull_request: CreatePullRequestPayload,
}

#[derive(Debug, Deserialize)]
struct CreatePullRequestPayload {
    #[serde(rename = "pullRequest")]
    pull_request: CreatedPullRequest,
}

#[derive(Debug, Deserialize)]
struct CreatedPullRequest {
    url: String,
}

impl From<CodeSearchItem> for CodeSearchHit {
    fn from(item: CodeSearchItem) -> Self {
        CodeSearchHit {
            repository: RepositoryIdentity {
                id: item.repository.id,
                name: item.repository.name,
                html_url: item.repository.html_url,
                node_id: item.repository.node_id,
            },
            path: item.path,
        }
    }
}

/// GitHub API client
pub struct GitHubClient {
    http: HttpClient,
}

impl GitHubClient {
    /// Create a new client
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Code search query for dependents of `dependency` within `owner`
    fn dependents_query(dependency: &str, owner: &str) -> String {
        format!(
            "\"{}\" user:{} in:file filename:package.json",
            dependency, owner
        )
    }

    /// Issue search query for open pull requests carrying `marker`
    fn tracked_pull_requests_query(owner: &str, repo: &str, marker: &str) -> String {
        format!("\"{}\" repo:{}/{} type:pr is:open", marker, owner, repo)
    }

    async fn search_code(&self, query: &str) -> Result<Vec<CodeSearchItem>, ForgeError> {
        let response: CodeSearchResponse = self
            .http
            .get_json(
                "/search/code",
                &[("q", query), ("per_page", SEARCH_PAGE_SIZE)],
            )
            .await?;
        Ok(response.items)
    }
}

#[async_trait]
impl ForgeClient for GitHubClient {
    async fn search_dependents(
        &self,
        dependency: &str,
        owner: &str,
    ) -> Result<Vec<RepositoryTarget>, ForgeError> {
        let items = self
            .search_code(&Self::dependents_query(dependency, owner))
            .await?;
        let hits: Vec<CodeSearchHit> = items.into_iter().map(CodeSearchHit::from).collect();
        Ok(group_by_repository(hits))
    }

    async fn search_manifest_dirs(&self, full_name: &str) -> Result<Vec<String>, ForgeError> {
        let query = format!("repo:{} in:file filename:package.json", full_name);
        let items = self.search_code(&query).await?;
        Ok(manifest_dirs_from_paths(items.into_iter().map(|i| i.path)))
    }

    async fn repository_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, ForgeError> {
        let response: RepositoryResponse = self
            .http
            .get_json(&format!("/repos/{}/{}", owner, repo), &[])
            .await?;

        Ok(RepositoryMetadata {
            default_branch: response.default_branch,
            package_manager: PackageManagerKind::from_topics(&response.topics),
        })
    }

    async fn find_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        marker: &str,
    ) -> Result<Vec<PullRequestSummary>, ForgeError> {
        let query = Self::tracked_pull_requests_query(owner, repo, marker);
        let response: IssueSearchResponse = self
            .http
            .get_json(
                "/search/issues",
                &[("q", query.as_str()), ("advanced_search", "true")],
            )
            .await?;

        debug!(repo, found = response.items.len(), "tracked pull requests");
        Ok(response.items)
    }

    async fn pull_request_head(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, ForgeError> {
        let response: PullRequestResponse = self
            .http
            .get_json(&format!("/repos/{}/{}/pulls/{}", owner, repo, number), &[])
            .await?;
        Ok(response.head.git_ref)
    }

    async fn create_pull_request(
        &self,
        request: &NewPullRequest<'_>,
    ) -> Result<String, ForgeError> {
        let variables = json!({
            "branchName": request.head,
            "id": request.repository_id,
            "commitMessage": request.title,
            "defaultBranch": request.base,
            "body": request.body,
        });

        let data: CreatePullRequestData = self
            .http
            .graphql(CREATE_PULL_REQUEST_MUTATION, variables)
            .await?;
        Ok(data.create_pull_request.pull_request.url)
    }
}
