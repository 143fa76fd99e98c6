//! Core domain models for orgbump
//!
//! This module contains the fundamental types used throughout the application:
//! - Repository targets produced by discovery
//! - The dependency change applied across repositories
//! - Dependency classification and package manager kinds
//! - Branch plans produced by reconciliation
//! - Per-repository outcomes and run reports

mod change;
mod classification;
mod outcome;
mod package_manager_kind;
mod plan;
mod report;
mod target;

pub use change::DependencyChange;
pub use classification::DependencyClassification;
pub use outcome::{
    CleanupStatus, FailureStage, ManifestReport, ManifestStatus, Outcome, RepositoryOutcome,
    SkipReason,
};
pub use package_manager_kind::PackageManagerKind;
pub use plan::BranchPlan;
pub use report::{PackageRun, RunReport};
pub use target::{RepositoryIdentity, RepositoryTarget};
