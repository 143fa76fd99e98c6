//! The dependency change applied to every dependent repository

use super::DependencyClassification;
use serde::{Deserialize, Serialize};

/// Name, target version and commit templates for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChange {
    /// Package name, matched exactly against manifest sections
    pub name: String,
    /// Version written by the installer
    pub version: String,
    /// Commit message used when any manifest declares a production dependency
    pub commit_message_prod: String,
    /// Commit message used when the dependency is only a development dependency
    pub commit_message_dev: String,
}

impl DependencyChange {
    /// Creates a change with the default commit message templates
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        let version = version.into();
        Self {
            commit_message_prod: format!("fix: update {} to {} version and others", name, version),
            commit_message_dev: format!(
                "chore: update {} to {} version and others",
                name, version
            ),
            name,
            version,
        }
    }

    /// Replaces the default templates with caller-supplied overrides
    pub fn with_commit_messages(mut self, prod: Option<String>, dev: Option<String>) -> Self {
        if let Some(prod) = prod.filter(|m| !m.trim().is_empty()) {
            self.commit_message_prod = prod;
        }
        if let Some(dev) = dev.filter(|m| !m.trim().is_empty()) {
            self.commit_message_dev = dev;
        }
        self
    }

    /// Branch name shared by every run bumping the same name and version
    pub fn working_branch_name(&self) -> String {
        format!("bot/bump-{}-{}", self.name, self.version)
    }

    /// Selects the commit message for a repository-level classification
    pub fn commit_message(&self, classification: DependencyClassification) -> &str {
        match classification {
            DependencyClassification::Prod => &self.commit_message_prod,
            _ => &self.commit_message_dev,
        }
    }
}
