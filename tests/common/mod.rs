//! Recording fakes of the orchestrator's collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use clap::Parser;
use orgbump::cli::CliArgs;
use orgbump::config::RunConfig;
use orgbump::domain::{PackageManagerKind, RepositoryIdentity, RepositoryTarget};
use orgbump::error::{ForgeError, InstallError, VcsError};
use orgbump::github::{ForgeClient, NewPullRequest, PullRequestSummary, RepositoryMetadata};
use orgbump::package_manager::Installer;
use orgbump::vcs::{PushRequest, VersionControl};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub fn repo_url(name: &str) -> String {
    format!("https://github.com/org/{}", name)
}

pub fn target(id: u64, name: &str, paths: &[&str]) -> RepositoryTarget {
    RepositoryTarget::new(
        RepositoryIdentity {
            id,
            name: name.to_string(),
            html_url: repo_url(name),
            node_id: format!("R_{}", name),
        },
        paths.iter().map(|p| p.to_string()).collect(),
    )
}

/// Writes the source package.json and returns a config rooted at `root`
pub fn config(root: &Path, extra: &[&str]) -> RunConfig {
    fs::write(
        root.join("package.json"),
        r#"{"name": "lib", "version": "2.0.0"}"#,
    )
    .unwrap();

    let local = root.to_string_lossy().to_string();
    let clones = root.join("clones").to_string_lossy().to_string();
    let mut argv = vec![
        "orgbump",
        "--github-token",
        "ghs_test",
        "--repository",
        "org/lib",
        "--packagejson-path",
        "./",
        "--local-repo-path",
        &local,
        "--clones-dir",
        &clones,
    ];
    argv.extend_from_slice(extra);
    RunConfig::from_cli(&CliArgs::parse_from(argv)).unwrap()
}

#[derive(Debug, Clone)]
pub struct OpenPullRequest {
    pub repo: String,
    pub number: u64,
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Forge whose created pull requests become searchable
#[derive(Default)]
pub struct FakeForge {
    pub dependents: Vec<RepositoryTarget>,
    pub topics: HashMap<String, PackageManagerKind>,
    pub fail_create: bool,
    pub open: Mutex<Vec<OpenPullRequest>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeForge {
    pub fn with_dependents(dependents: Vec<RepositoryTarget>) -> Self {
        Self {
            dependents,
            ..Default::default()
        }
    }

    pub fn open_pull_request(&self, repo: &str, number: u64, head: &str, body: &str) {
        self.open.lock().unwrap().push(OpenPullRequest {
            repo: repo.to_string(),
            number,
            head: head.to_string(),
            base: "main".to_string(),
            title: "existing".to_string(),
            body: body.to_string(),
        });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with("create_pull_request"))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ForgeClient for FakeForge {
    async fn search_dependents(
        &self,
        dependency: &str,
        owner: &str,
    ) -> Result<Vec<RepositoryTarget>, ForgeError> {
        self.record(format!("search_dependents {} {}", dependency, owner));
        Ok(self.dependents.clone())
    }

    async fn search_manifest_dirs(&self, full_name: &str) -> Result<Vec<String>, ForgeError> {
        self.record(format!("search_manifest_dirs {}", full_name));
        Ok(Vec::new())
    }

    async fn repository_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, ForgeError> {
        self.record(format!("repository_metadata {}/{}", owner, repo));
        Ok(RepositoryMetadata {
            default_branch: "main".to_string(),
            package_manager: self.topics.get(repo).copied(),
        })
    }

    async fn find_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        marker: &str,
    ) -> Result<Vec<PullRequestSummary>, ForgeError> {
        self.record(format!("find_open_pull_requests {}/{} {}", owner, repo, marker));
        Ok(self
            .open
            .lock()
            .unwrap()
            .iter()
            .filter(|pr| pr.repo == repo && pr.body.contains(marker))
            .map(|pr| PullRequestSummary {
                number: pr.number,
                title: pr.title.clone(),
                html_url: format!("{}/pull/{}", repo_url(repo), pr.number),
            })
            .collect())
    }

    async fn pull_request_head(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, ForgeError> {
        self.record(format!("pull_request_head {}/{} {}", owner, repo, number));
        self.open
            .lock()
            .unwrap()
            .iter()
            .find(|pr| pr.repo == repo && pr.number == number)
            .map(|pr| pr.head.clone())
            .ok_or_else(|| ForgeError::invalid_response("/pulls", "no such pull request"))
    }

    async fn create_pull_request(
        &self,
        request: &NewPullRequest<'_>,
    ) -> Result<String, ForgeError> {
        self.record(format!(
            "create_pull_request {} {} <- {}",
            request.repository_id, request.base, request.head
        ));
        if self.fail_create {
            return Err(ForgeError::Status {
                endpoint: "/graphql".to_string(),
                status: 502,
                message: "Bad Gateway".to_string(),
            });
        }

        let repo = request.repository_id.trim_start_matches("R_").to_string();
        let mut open = self.open.lock().unwrap();
        let number = open.len() as u64 + 1;
        open.push(OpenPullRequest {
            repo: repo.clone(),
            number,
            head: request.head.to_string(),
            base: request.base.to_string(),
            title: request.title.to_string(),
            body: request.body.to_string(),
        });
        Ok(format!("{}/pull/{}", repo_url(&repo), number))
    }
}

/// Version control that materializes fixture files instead of cloning
#[derive(Default)]
pub struct FakeVcs {
    pub files: HashMap<String, Vec<(String, String)>>,
    pub fail_clone: Vec<String>,
    pub fail_delete: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeVcs {
    pub fn repository(mut self, name: &str, files: &[(&str, &str)]) -> Self {
        self.files.insert(
            repo_url(name),
            files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VersionControl for FakeVcs {
    async fn clone_repository(&self, url: &str, dir: &Path, branch: &str) -> Result<(), VcsError> {
        self.record(format!("clone {} {}", url, branch));
        if self.fail_clone.iter().any(|u| u == url) {
            return Err(VcsError::command_failed("clone", "repository not found"));
        }
        for (rel, content) in self.files.get(url).into_iter().flatten() {
            let path = dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        Ok(())
    }

    async fn create_branch(&self, _dir: &Path, name: &str) -> Result<(), VcsError> {
        self.record(format!("create_branch {}", name));
        Ok(())
    }

    async fn push(&self, _dir: &Path, request: &PushRequest<'_>) -> Result<(), VcsError> {
        self.record(format!(
            "push {} {} [{}] {}",
            request.remote_url, request.branch, request.identity.name, request.message
        ));
        Ok(())
    }

    async fn delete_remote_branch(&self, _dir: &Path, name: &str) -> Result<(), VcsError> {
        self.record(format!("delete_remote_branch {}", name));
        if self.fail_delete {
            return Err(VcsError::command_failed("push --delete", "permission denied"));
        }
        Ok(())
    }
}

/// Installer that records every invocation
#[derive(Default)]
pub struct FakeInstaller {
    pub calls: Mutex<Vec<(String, PathBuf, PackageManagerKind)>>,
}

impl FakeInstaller {
    pub fn calls(&self) -> Vec<(String, PathBuf, PackageManagerKind)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Installer for FakeInstaller {
    async fn install(
        &self,
        name: &str,
        version: &str,
        cwd: &Path,
        kind: PackageManagerKind,
    ) -> Result<(), InstallError> {
        self.calls
            .lock()
            .unwrap()
            .push((format!("{}@{}", name, version), cwd.to_path_buf(), kind));
        Ok(())
    }
}
