//! Branch plans produced by reconciliation

use serde::{Deserialize, Serialize};

/// Where a repository's changes will be committed
///
/// A reused branch belongs to an open tracked pull request; publishing onto it
/// never opens a second pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchPlan {
    /// Clone `base_branch` and create `branch_name` on top of it
    Fresh {
        base_branch: String,
        branch_name: String,
    },
    /// Clone the head branch of an existing pull request and commit onto it
    Reused { branch_name: String },
}

impl BranchPlan {
    /// Branch the commit is pushed to
    pub fn branch_name(&self) -> &str {
        match self {
            BranchPlan::Fresh { branch_name, .. } => branch_name,
            BranchPlan::Reused { branch_name } => branch_name,
        }
    }

    /// Branch checked out by the clone
    pub fn base_branch(&self) -> &str {
        match self {
            BranchPlan::Fresh { base_branch, .. } => base_branch,
            BranchPlan::Reused { branch_name } => branch_name,
        }
    }

    /// Returns true when operating on an existing pull request's branch
    pub fn is_reused(&self) -> bool {
        matches!(self, BranchPlan::Reused { .. })
    }
}
