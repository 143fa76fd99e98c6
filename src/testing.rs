//! In-memory collaborators shared by unit tests

use crate::domain::{PackageManagerKind, RepositoryIdentity, RepositoryTarget};
use crate::error::{ForgeError, InstallError, VcsError};
use crate::github::{ForgeClient, NewPullRequest, PullRequestSummary, RepositoryMetadata};
use crate::package_manager::Installer;
use crate::vcs::{PushRequest, VersionControl};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub fn identity(id: u64, name: &str) -> RepositoryIdentity {
    RepositoryIdentity {
        id,
        name: name.to_string(),
        html_url: format!("https://github.com/org/{}", name),
        node_id: format!("R_{}", name),
    }
}

pub fn target(id: u64, name: &str, paths: &[&str]) -> RepositoryTarget {
    RepositoryTarget::new(
        identity(id, name),
        paths.iter().map(|p| p.to_string()).collect(),
    )
}

#[derive(Default)]
pub struct FakeForge {
    pub dependents: Vec<RepositoryTarget>,
    pub manifest_dirs: Vec<String>,
    pub default_branch: Option<String>,
    pub topics: HashMap<String, PackageManagerKind>,
    pub open_prs: HashMap<String, Vec<PullRequestSummary>>,
    pub heads: HashMap<u64, String>,
    pub fail_search: bool,
    pub fail_metadata: bool,
    pub fail_create: bool,
    pub calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<(String, String, String, String, String)>>,
}

impl FakeForge {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
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
        if self.fail_search {
            return Err(ForgeError::network("/search/code", "connection refused"));
        }
        Ok(self.dependents.clone())
    }

    async fn search_manifest_dirs(&self, full_name: &str) -> Result<Vec<String>, ForgeError> {
        self.record(format!("search_manifest_dirs {}", full_name));
        Ok(self.manifest_dirs.clone())
    }

    async fn repository_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, ForgeError> {
        self.record(format!("repository_metadata {}/{}", owner, repo));
        if self.fail_metadata {
            return Err(ForgeError::Status {
                endpoint: format!("/repos/{}/{}", owner, repo),
                status: 404,
                message: "Not Found".to_string(),
            });
        }
        Ok(RepositoryMetadata {
            default_branch: self
                .default_branch
                .clone()
                .unwrap_or_else(|| "main".to_string()),
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
        Ok(self.open_prs.get(repo).cloned().unwrap_or_default())
    }

    async fn pull_request_head(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, ForgeError> {
        self.record(format!("pull_request_head {}/{} {}", owner, repo, number));
        self.heads
            .get(&number)
            .cloned()
            .ok_or_else(|| ForgeError::invalid_response("/pulls", "unknown pull request"))
    }

    async fn create_pull_request(
        &self,
        request: &NewPullRequest<'_>,
    ) -> Result<String, ForgeError> {
        self.record(format!("create_pull_request {}", request.head));
        if self.fail_create {
            return Err(ForgeError::GraphQl {
                messages: vec!["A pull request already exists".to_string()],
            });
        }
        self.created.lock().unwrap().push((
            request.repository_id.to_string(),
            request.base.to_string(),
            request.head.to_string(),
            request.title.to_string(),
            request.body.to_string(),
        ));
        Ok(format!("https://github.com/org/pull/{}", request.head))
    }
}

/// Writes fixture files into the clone directory instead of cloning
#[derive(Default)]
pub struct FakeVcs {
    /// Files per remote URL, as (relative path, content)
    pub files: HashMap<String, Vec<(String, String)>>,
    pub fail_clone: bool,
    pub fail_branch: bool,
    pub fail_push: bool,
    pub fail_delete: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeVcs {
    pub fn with_files(mut self, url: &str, files: &[(&str, &str)]) -> Self {
        self.files.insert(
            url.to_string(),
            files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        );
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn failure(command: &str) -> VcsError {
        VcsError::command_failed(command, "fatal: simulated")
    }
}

#[async_trait]
impl VersionControl for FakeVcs {
    async fn clone_repository(&self, url: &str, dir: &Path, branch: &str) -> Result<(), VcsError> {
        self.record(format!("clone {} {}", url, branch));
        if self.fail_clone {
            return Err(Self::failure("clone"));
        }
        for (rel, content) in self.files.get(url).into_iter().flatten() {
            let path = dir.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        Ok(())
    }

    async fn create_branch(&self, _dir: &Path, name: &str) -> Result<(), VcsError> {
        self.record(format!("create_branch {}", name));
        if self.fail_branch {
            return Err(Self::failure("checkout -b"));
        }
        Ok(())
    }

    async fn push(&self, _dir: &Path, request: &PushRequest<'_>) -> Result<(), VcsError> {
        self.record(format!("push {} {}", request.branch, request.message));
        if self.fail_push {
            return Err(Self::failure("push"));
        }
        Ok(())
    }

    async fn delete_remote_branch(&self, _dir: &Path, name: &str) -> Result<(), VcsError> {
        self.record(format!("delete_remote_branch {}", name));
        if self.fail_delete {
            return Err(Self::failure("push --delete"));
        }
        Ok(())
    }
}

/// Records install calls and always succeeds unless the directory is listed
#[derive(Default)]
pub struct FakeInstaller {
    pub failing: Vec<PathBuf>,
    pub calls: Mutex<Vec<(String, PathBuf, PackageManagerKind)>>,
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
        if self.failing.iter().any(|p| p == cwd) {
            return Err(InstallError::ExitStatus {
                command: format!("{} add {}@{}", kind, name, version),
                status: "exit status: 1".to_string(),
                stderr: "simulated".to_string(),
            });
        }
        Ok(())
    }
}
