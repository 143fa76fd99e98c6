//! Per-repository and per-manifest outcomes

use super::{DependencyClassification, PackageManagerKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a repository was not published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Repository is in the ignore list
    Ignored,
    /// No manifest declares the dependency
    NoApplicableChange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Ignored => write!(f, "ignored"),
            SkipReason::NoApplicableChange => write!(f, "dependency not declared in any manifest"),
        }
    }
}

/// Step at which a repository failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Looking up an existing tracked pull request
    Reconcile,
    /// Fetching default branch and topics
    Metadata,
    Clone,
    CreateBranch,
    /// Every applicable manifest failed to install
    Mutate,
    Push,
    CreatePullRequest,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureStage::Reconcile => "pull request lookup",
            FailureStage::Metadata => "repository metadata",
            FailureStage::Clone => "clone",
            FailureStage::CreateBranch => "branch creation",
            FailureStage::Mutate => "dependency install",
            FailureStage::Push => "push",
            FailureStage::CreatePullRequest => "pull request creation",
        };
        write!(f, "{}", label)
    }
}

/// Result of deleting an orphaned remote branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cleanup", rename_all = "snake_case")]
pub enum CleanupStatus {
    RemoteBranchDeleted,
    Failed { message: String },
}

/// Final state of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A new branch was pushed and a pull request opened
    PullRequestCreated { url: String, branch: String },
    /// Changes were pushed to the head branch of an existing pull request
    PushedToExistingBranch { branch: String },
    Skipped { reason: SkipReason },
    Failed {
        stage: FailureStage,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cleanup: Option<CleanupStatus>,
    },
}

impl Outcome {
    /// Creates a Failed outcome without cleanup
    pub fn failed(stage: FailureStage, message: impl Into<String>) -> Self {
        Outcome::Failed {
            stage,
            message: message.into(),
            cleanup: None,
        }
    }

    /// Creates a Skipped outcome
    pub fn skipped(reason: SkipReason) -> Self {
        Outcome::Skipped { reason }
    }

    /// Returns true for a created pull request or a push to an existing branch
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::PullRequestCreated { .. } | Outcome::PushedToExistingBranch { .. }
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::PullRequestCreated { url, .. } => write!(f, "pull request created: {}", url),
            Outcome::PushedToExistingBranch { branch } => {
                write!(f, "pushed to existing branch {}", branch)
            }
            Outcome::Skipped { reason } => write!(f, "skipped ({})", reason),
            Outcome::Failed {
                stage,
                message,
                cleanup,
            } => {
                write!(f, "{} failed: {}", stage, message)?;
                match cleanup {
                    Some(CleanupStatus::RemoteBranchDeleted) => {
                        write!(f, " (orphaned branch removed)")
                    }
                    Some(CleanupStatus::Failed { message }) => {
                        write!(f, " (branch cleanup failed: {})", message)
                    }
                    None => Ok(()),
                }
            }
        }
    }
}

/// What happened to one manifest path of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ManifestStatus {
    /// Installer wrote the new version
    Updated {
        classification: DependencyClassification,
    },
    /// Base name is not `package.json`
    NotManifest,
    /// Dependency is in neither section
    NotDeclared,
    /// Manifest could not be read or parsed
    Unreadable { message: String },
    /// Installer invocation failed
    InstallFailed {
        classification: DependencyClassification,
        message: String,
    },
}

/// Status of one manifest path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestReport {
    pub path: String,
    #[serde(flatten)]
    pub status: ManifestStatus,
}

impl ManifestReport {
    pub fn new(path: impl Into<String>, status: ManifestStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }

    /// Classification of a manifest the dependency is declared in
    pub fn classification(&self) -> DependencyClassification {
        match &self.status {
            ManifestStatus::Updated { classification }
            | ManifestStatus::InstallFailed { classification, .. } => *classification,
            _ => DependencyClassification::None,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self.status, ManifestStatus::Updated { .. })
    }
}

/// Outcome of one repository with the details that led to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOutcome {
    pub repository: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManagerKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manifests: Vec<ManifestReport>,
    pub outcome: Outcome,
}

impl RepositoryOutcome {
    pub fn new(repository: impl Into<String>, url: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            repository: repository.into(),
            url: url.into(),
            package_manager: None,
            manifests: Vec::new(),
            outcome,
        }
    }
}
