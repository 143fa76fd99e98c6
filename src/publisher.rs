//! Publishing of a mutated working clone
//!
//! A reused branch is only pushed. A fresh branch is pushed and a pull request
//! is opened against its base; when opening fails the pushed branch is deleted
//! again so no untracked branch is left on the remote.

use crate::domain::{BranchPlan, CleanupStatus, FailureStage, Outcome, RepositoryTarget};
use crate::error::{CompensationError, PublishError};
use crate::github::{tracking_marker, ForgeClient, NewPullRequest};
use crate::reconciler::WorkingClone;
use crate::vcs::{CommitIdentity, PushRequest, VersionControl};
use std::sync::Arc;
use tracing::{info, warn};

pub struct PublishCoordinator {
    forge: Arc<dyn ForgeClient>,
    vcs: Arc<dyn VersionControl>,
    identity: CommitIdentity,
    tracking_id: Option<String>,
}

impl PublishCoordinator {
    pub fn new(
        forge: Arc<dyn ForgeClient>,
        vcs: Arc<dyn VersionControl>,
        identity: CommitIdentity,
        tracking_id: Option<String>,
    ) -> Self {
        Self {
            forge,
            vcs,
            identity,
            tracking_id,
        }
    }

    /// Pull request body: the tracking marker, or empty without a tracking id
    fn body(&self) -> String {
        self.tracking_id
            .as_deref()
            .map(tracking_marker)
            .unwrap_or_default()
    }

    pub async fn publish(
        &self,
        target: &RepositoryTarget,
        clone: &WorkingClone,
        commit_message: &str,
    ) -> Outcome {
        let branch = clone.plan.branch_name();
        info!(branch, url = %target.identity.html_url, "pushing changes");

        let request = PushRequest {
            remote_url: &target.identity.html_url,
            branch,
            message: commit_message,
            identity: &self.identity,
        };
        if let Err(e) = self.vcs.push(&clone.dir, &request).await {
            warn!(branch, "pushing changes failed: {}", e);
            return Outcome::failed(FailureStage::Push, e.to_string());
        }

        let base_branch = match &clone.plan {
            BranchPlan::Reused { branch_name } => {
                return Outcome::PushedToExistingBranch {
                    branch: branch_name.clone(),
                };
            }
            BranchPlan::Fresh { base_branch, .. } => base_branch,
        };

        let body = self.body();
        let pull_request = NewPullRequest {
            repository_id: &target.identity.node_id,
            base: base_branch,
            head: branch,
            title: commit_message,
            body: &body,
        };

        info!(branch, base = %base_branch, "opening pull request");
        match self.forge.create_pull_request(&pull_request).await {
            Ok(url) => {
                info!(%url, "pull request created");
                Outcome::PullRequestCreated {
                    url,
                    branch: branch.to_string(),
                }
            }
            Err(source) => {
                let error = PublishError {
                    branch: branch.to_string(),
                    source,
                };
                warn!("{}", error);
                let cleanup = self.remove_orphaned_branch(clone, branch).await;
                Outcome::Failed {
                    stage: FailureStage::CreatePullRequest,
                    message: error.to_string(),
                    cleanup: Some(cleanup),
                }
            }
        }
    }

    async fn remove_orphaned_branch(&self, clone: &WorkingClone, branch: &str) -> CleanupStatus {
        info!(branch, "removing branch pushed before the failed pull request");
        match self.vcs.delete_remote_branch(&clone.dir, branch).await {
            Ok(()) => CleanupStatus::RemoteBranchDeleted,
            Err(source) => {
                let error = CompensationError {
                    branch: branch.to_string(),
                    source,
                };
                warn!("{}", error);
                CleanupStatus::Failed {
                    message: error.to_string(),
                }
            }
        }
    }
}
