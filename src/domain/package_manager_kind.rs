//! Package manager kinds supported for Node.js repositories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node.js package managers the installer can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    Npm,
    Yarn,
    Pnpm,
    Bun,
    /// Nothing could be resolved
    Unknown,
}

/// Order in which repository topics are checked
const TOPIC_PRIORITY: [PackageManagerKind; 4] = [
    PackageManagerKind::Pnpm,
    PackageManagerKind::Yarn,
    PackageManagerKind::Bun,
    PackageManagerKind::Npm,
];

impl PackageManagerKind {
    /// Parses a recognized label; `unknown` and anything else yield None
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "npm" => Some(PackageManagerKind::Npm),
            "yarn" => Some(PackageManagerKind::Yarn),
            "pnpm" => Some(PackageManagerKind::Pnpm),
            "bun" => Some(PackageManagerKind::Bun),
            _ => None,
        }
    }

    /// Picks a kind from repository topic tags (pnpm, yarn, bun, npm)
    pub fn from_topics(topics: &[String]) -> Option<Self> {
        TOPIC_PRIORITY
            .into_iter()
            .find(|kind| topics.iter().any(|t| t == kind.as_str()))
    }

    /// Reads a `packageManager` manifest value such as `pnpm@9.1.0`
    pub fn from_declared_field(value: &str) -> Option<Self> {
        let name = value.split('@').next().unwrap_or_default();
        Self::parse_label(name)
    }

    /// Returns the lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "npm",
            PackageManagerKind::Yarn => "yarn",
            PackageManagerKind::Pnpm => "pnpm",
            PackageManagerKind::Bun => "bun",
            PackageManagerKind::Unknown => "unknown",
        }
    }

    /// Returns true unless this is `Unknown`
    pub fn is_known(&self) -> bool {
        !matches!(self, PackageManagerKind::Unknown)
    }

    /// Replaces `Unknown` with a fallback kind
    pub fn or(self, fallback: PackageManagerKind) -> Self {
        if self.is_known() {
            self
        } else {
            fallback
        }
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PackageManagerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s).ok_or_else(|| {
            format!(
                "unsupported package manager '{}': expected npm, yarn, pnpm or bun",
                s
            )
        })
    }
}
