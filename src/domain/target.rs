//! Repositories handed to the orchestrator by discovery

use serde::{Deserialize, Serialize};

/// Identity of a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    /// Numeric repository id, used to group search results
    pub id: u64,
    /// Repository name without owner
    pub name: String,
    /// Browser URL, also used as the clone/push remote
    pub html_url: String,
    /// Opaque GraphQL node id
    pub node_id: String,
}

/// A repository together with the manifest paths that mention the dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryTarget {
    pub identity: RepositoryIdentity,
    /// Paths relative to the repository root, in discovery order
    pub manifest_paths: Vec<String>,
}

impl RepositoryTarget {
    /// Creates a target with the given identity and manifest paths
    pub fn new(identity: RepositoryIdentity, manifest_paths: Vec<String>) -> Self {
        Self {
            identity,
            manifest_paths,
        }
    }

    /// Returns the repository name
    pub fn name(&self) -> &str {
        &self.identity.name
    }
}
