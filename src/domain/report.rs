//! Run report types
//!
//! Provides structures for tracking outcomes at package-run and overall levels.

use super::RepositoryOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of bumping one source package across the organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRun {
    /// Manifest directory the dependency name and version were read from
    pub source_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Outcomes in discovery order
    pub repositories: Vec<RepositoryOutcome>,
    /// Set when the package run could not get as far as processing repositories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PackageRun {
    /// Starts a package run for a source path
    pub fn start(source_path: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            source_path: source_path.into(),
            dependency: None,
            version: None,
            repositories: Vec::new(),
            error: None,
            started_at: now,
            finished_at: now,
        }
    }

    /// Marks the run as finished
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Marks the run as failed before repositories were processed
    pub fn fail(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.finish()
    }

    pub fn created_count(&self) -> usize {
        self.repositories
            .iter()
            .filter(|r| matches!(r.outcome, super::Outcome::PullRequestCreated { .. }))
            .count()
    }

    pub fn pushed_count(&self) -> usize {
        self.repositories
            .iter()
            .filter(|r| matches!(r.outcome, super::Outcome::PushedToExistingBranch { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.repositories.iter().filter(|r| r.outcome.is_skip()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.repositories
            .iter()
            .filter(|r| r.outcome.is_failure())
            .count()
    }

    /// True when discovery found no dependents
    pub fn is_noop(&self) -> bool {
        self.error.is_none() && self.repositories.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        self.error.is_some() || self.failed_count() > 0
    }
}

/// Overall report of all package runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub packages: Vec<PackageRun>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_package(&mut self, run: PackageRun) {
        self.packages.push(run);
    }

    /// Returns true if any package run or repository failed
    pub fn has_failures(&self) -> bool {
        self.packages.iter().any(|p| p.has_failures())
    }

    pub fn total_created(&self) -> usize {
        self.packages.iter().map(|p| p.created_count()).sum()
    }

    pub fn total_pushed(&self) -> usize {
        self.packages.iter().map(|p| p.pushed_count()).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.packages.iter().map(|p| p.failed_count()).sum()
    }
}
