//! orgbump - organization-wide dependency bump library
//!
//! Discovers the repositories of an organization that depend on a package,
//! installs the new version in each of them and publishes the change as a
//! pull request, reusing an open tracked pull request when one exists.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod github;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod publisher;
pub mod reconciler;
pub mod telemetry;
pub mod vcs;

#[cfg(test)]
mod testing;
