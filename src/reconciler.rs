//! Branch and pull request reconciliation
//!
//! Decides whether a repository is worked on through the head branch of an
//! open tracked pull request or through a fresh branch, then prepares the
//! working clone accordingly.

use crate::domain::{BranchPlan, DependencyChange, RepositoryTarget};
use crate::error::{ForgeError, SetupError};
use crate::github::{tracking_marker, ForgeClient};
use crate::vcs::VersionControl;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A clone checked out on the branch the change is applied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingClone {
    pub dir: PathBuf,
    pub plan: BranchPlan,
}

pub struct BranchReconciler {
    forge: Arc<dyn ForgeClient>,
    vcs: Arc<dyn VersionControl>,
}

impl BranchReconciler {
    pub fn new(forge: Arc<dyn ForgeClient>, vcs: Arc<dyn VersionControl>) -> Self {
        Self { forge, vcs }
    }

    /// Head branch of the first open pull request carrying the tracking marker
    ///
    /// Returns `None` without any API call when no tracking id is configured.
    pub async fn find_existing_branch(
        &self,
        owner: &str,
        repo: &str,
        tracking_id: Option<&str>,
    ) -> Result<Option<String>, ForgeError> {
        let Some(tracking_id) = tracking_id else {
            return Ok(None);
        };

        let marker = tracking_marker(tracking_id);
        let pull_requests = self
            .forge
            .find_open_pull_requests(owner, repo, &marker)
            .await?;

        let Some(first) = pull_requests.first() else {
            debug!(repo, "no open pull request carries the tracking marker");
            return Ok(None);
        };

        let branch = self.forge.pull_request_head(owner, repo, first.number).await?;
        info!(
            repo,
            pull_request = %first.html_url,
            %branch,
            "found existing pull request, reusing its branch"
        );
        Ok(Some(branch))
    }

    /// Existing branch, else override, else the default branch
    pub fn plan(
        existing_branch: Option<String>,
        base_override: Option<&str>,
        default_branch: &str,
        change: &DependencyChange,
    ) -> BranchPlan {
        match existing_branch {
            Some(branch_name) => BranchPlan::Reused { branch_name },
            None => BranchPlan::Fresh {
                base_branch: base_override.unwrap_or(default_branch).to_string(),
                branch_name: change.working_branch_name(),
            },
        }
    }

    /// Reset `clone_dir`, clone at the plan's base and create a fresh branch
    pub async fn prepare(
        &self,
        target: &RepositoryTarget,
        plan: BranchPlan,
        clone_dir: PathBuf,
    ) -> Result<WorkingClone, SetupError> {
        if let Err(e) = reset_dir(&clone_dir).await {
            warn!(dir = %clone_dir.display(), "could not create clone directory: {}", e);
        }

        info!(
            url = %target.identity.html_url,
            branch = plan.base_branch(),
            "cloning repository"
        );
        self.vcs
            .clone_repository(&target.identity.html_url, &clone_dir, plan.base_branch())
            .await
            .map_err(SetupError::Clone)?;

        if let BranchPlan::Fresh { branch_name, .. } = &plan {
            self.vcs
                .create_branch(&clone_dir, branch_name)
                .await
                .map_err(SetupError::CreateBranch)?;
        }

        Ok(WorkingClone {
            dir: clone_dir,
            plan,
        })
    }
}

async fn reset_dir(dir: &Path) -> io::Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    tokio::fs::create_dir_all(dir).await
}
