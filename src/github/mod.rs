//! GitHub collaborators
//!
//! This module provides:
//! - Discovery of dependent repositories through code search
//! - Repository metadata (default branch, package manager topic)
//! - Search for open pull requests carrying a tracking marker
//! - Pull request creation through GraphQL

mod api;
mod client;

pub use api::GitHubClient;
pub use client::{HttpClient, DEFAULT_API_URL};

use crate::domain::{PackageManagerKind, RepositoryIdentity, RepositoryTarget};
use crate::error::ForgeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default branch and package manager label of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    pub default_branch: String,
    /// Kind named by a topic tag, if any
    pub package_manager: Option<PackageManagerKind>,
}

/// An open pull request returned by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub html_url: String,
}

/// Parameters of a pull request to open
#[derive(Debug, Clone, Copy)]
pub struct NewPullRequest<'a> {
    /// GraphQL node id of the repository
    pub repository_id: &'a str,
    pub base: &'a str,
    pub head: &'a str,
    pub title: &'a str,
    pub body: &'a str,
}

/// A code search hit, before grouping by repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSearchHit {
    pub repository: RepositoryIdentity,
    pub path: String,
}

/// Trait for the GitHub API operations the orchestrator depends on
#[async_trait]
pub trait ForgeClient: Send + Sync {
    /// Repositories of `owner` whose package.json mentions `dependency`
    ///
    /// Returns an empty list when nothing matches.
    async fn search_dependents(
        &self,
        dependency: &str,
        owner: &str,
    ) -> Result<Vec<RepositoryTarget>, ForgeError>;

    /// Directories of every package.json in `full_name` (`owner/name`)
    async fn search_manifest_dirs(&self, full_name: &str) -> Result<Vec<String>, ForgeError>;

    /// Default branch and topic-derived package manager of a repository
    async fn repository_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, ForgeError>;

    /// Open pull requests whose body contains `marker`, in API order
    async fn find_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        marker: &str,
    ) -> Result<Vec<PullRequestSummary>, ForgeError>;

    /// Head branch name of a pull request
    async fn pull_request_head(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, ForgeError>;

    /// Open a pull request and return its URL
    async fn create_pull_request(&self, request: &NewPullRequest<'_>)
        -> Result<String, ForgeError>;
}

/// Machine-matchable marker embedded in pull request bodies
pub fn tracking_marker(tracking_id: &str) -> String {
    format!("<!-- {} -->", tracking_id)
}

/// Group search hits by repository id
///
/// Repositories keep the order in which they were first seen, and paths keep
/// their order within each repository.
pub fn group_by_repository(hits: Vec<CodeSearchHit>) -> Vec<RepositoryTarget> {
    let mut targets: Vec<RepositoryTarget> = Vec::new();

    for hit in hits {
        match targets
            .iter_mut()
            .find(|t| t.identity.id == hit.repository.id)
        {
            Some(target) => target.manifest_paths.push(hit.path),
            None => targets.push(RepositoryTarget::new(hit.repository, vec![hit.path])),
        }
    }

    targets
}

/// Turn package.json paths into their directories (`apps/web/package.json` -> `apps/web/`)
pub fn manifest_dirs_from_paths<I>(paths: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    paths
        .into_iter()
        .map(|p| {
            p.strip_suffix(crate::manifest::MANIFEST_FILENAME)
                .map(str::to_string)
                .unwrap_or(p)
        })
        .collect()
}
