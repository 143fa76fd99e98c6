//! Package manager resolution for a cloned repository
//!
//! Probes are tried in a fixed priority order and the first recognized kind wins:
//! 1. repository topic label
//! 2. `packageManager` field of the candidate manifests, then the root manifest
//!
//! When nothing resolves the kind is `Unknown` and the mutator's fallback applies.

use crate::domain::PackageManagerKind;
use crate::manifest::{is_manifest_path, PackageJson, MANIFEST_FILENAME};
use std::path::Path;
use tracing::{debug, warn};

/// Inputs available to every probe
#[derive(Debug, Clone, Copy)]
pub struct ProbeContext<'a> {
    /// Kind inferred from repository topics by the metadata collaborator
    pub topic_label: Option<PackageManagerKind>,
    /// Root of the working clone
    pub clone_dir: &'a Path,
    /// Candidate manifest paths relative to `clone_dir`, in discovery order
    pub manifest_paths: &'a [String],
}

/// One step of the resolution chain
pub trait PackageManagerProbe: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Returns a kind if this probe can decide
    fn probe(&self, context: &ProbeContext<'_>) -> Option<PackageManagerKind>;
}

/// Uses the organizational topic label attached to the repository
pub struct TopicProbe;

impl PackageManagerProbe for TopicProbe {
    fn name(&self) -> &'static str {
        "topic"
    }

    fn probe(&self, context: &ProbeContext<'_>) -> Option<PackageManagerKind> {
        context.topic_label.filter(PackageManagerKind::is_known)
    }
}

/// Reads the `packageManager` field of each candidate manifest
pub struct DeclaredFieldProbe;

impl DeclaredFieldProbe {
    /// Candidate paths followed by the root manifest, without duplicates
    fn candidates<'a>(manifest_paths: &'a [String]) -> Vec<&'a str> {
        let mut candidates: Vec<&str> = manifest_paths.iter().map(String::as_str).collect();
        if !candidates.contains(&MANIFEST_FILENAME) {
            candidates.push(MANIFEST_FILENAME);
        }
        candidates
    }
}

impl PackageManagerProbe for DeclaredFieldProbe {
    fn name(&self) -> &'static str {
        "packageManager field"
    }

    fn probe(&self, context: &ProbeContext<'_>) -> Option<PackageManagerKind> {
        for path in Self::candidates(context.manifest_paths) {
            if !is_manifest_path(path) {
                debug!(path, "not a package.json, skipping package manager probe");
                continue;
            }

            match PackageJson::load(&context.clone_dir.join(path)) {
                Ok(manifest) => {
                    if let Some(kind) = manifest.declared_package_manager() {
                        return Some(kind);
                    }
                }
                Err(e) => {
                    warn!(
                        path,
                        "could not read package.json to determine package manager: {}", e
                    );
                }
            }
        }
        None
    }
}

/// Ordered list of probes
pub struct PackageManagerResolver {
    probes: Vec<Box<dyn PackageManagerProbe>>,
}

impl PackageManagerResolver {
    /// Create a resolver with a custom probe order
    pub fn with_probes(probes: Vec<Box<dyn PackageManagerProbe>>) -> Self {
        Self { probes }
    }

    /// Resolve the kind, or `Unknown` when no probe decides
    pub fn resolve(&self, context: &ProbeContext<'_>) -> PackageManagerKind {
        for probe in &self.probes {
            if let Some(kind) = probe.probe(context) {
                debug!(probe = probe.name(), %kind, "package manager resolved");
                return kind;
            }
        }
        PackageManagerKind::Unknown
    }
}

impl Default for PackageManagerResolver {
    fn default() -> Self {
        Self::with_probes(vec![Box::new(TopicProbe), Box::new(DeclaredFieldProbe)])
    }
}
