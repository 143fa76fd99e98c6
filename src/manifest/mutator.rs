//! Applies the dependency change to the manifests of a cloned repository

use super::{is_manifest_path, manifest_dir, PackageJson};
use crate::domain::{
    DependencyChange, DependencyClassification, ManifestReport, ManifestStatus,
    PackageManagerKind,
};
use crate::error::InstallError;
use crate::package_manager::Installer;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Writes a new dependency version through the selected package manager
pub struct ManifestMutator {
    installer: Arc<dyn Installer>,
    /// Installer used when the repository's package manager is unknown
    fallback: PackageManagerKind,
}

impl ManifestMutator {
    /// Create a mutator that falls back to npm
    pub fn new(installer: Arc<dyn Installer>) -> Self {
        Self::with_fallback(installer, PackageManagerKind::Npm)
    }

    /// Create a mutator with a custom fallback package manager
    pub fn with_fallback(installer: Arc<dyn Installer>, fallback: PackageManagerKind) -> Self {
        Self {
            installer,
            fallback: fallback.or(PackageManagerKind::Npm),
        }
    }

    /// Package manager actually invoked for a resolved kind
    pub fn effective_kind(&self, kind: PackageManagerKind) -> PackageManagerKind {
        kind.or(self.fallback)
    }

    /// Install `name@version` in the directory containing `manifest_path`
    pub async fn apply_version(
        &self,
        name: &str,
        version: &str,
        manifest_path: &Path,
        kind: PackageManagerKind,
    ) -> Result<(), InstallError> {
        let cwd = manifest_dir(manifest_path);
        self.installer
            .install(name, version, &cwd, self.effective_kind(kind))
            .await
    }

    /// Classify and mutate every manifest path of a repository, in order
    ///
    /// Per-file failures are recorded and never stop the remaining files.
    pub async fn apply_to_repository(
        &self,
        clone_dir: &Path,
        manifest_paths: &[String],
        change: &DependencyChange,
        kind: PackageManagerKind,
    ) -> Vec<ManifestReport> {
        let mut reports = Vec::with_capacity(manifest_paths.len());

        for path in manifest_paths {
            let status = self.apply_to_manifest(clone_dir, path, change, kind).await;
            reports.push(ManifestReport::new(path.clone(), status));
        }

        reports
    }

    async fn apply_to_manifest(
        &self,
        clone_dir: &Path,
        path: &str,
        change: &DependencyChange,
        kind: PackageManagerKind,
    ) -> ManifestStatus {
        if !is_manifest_path(path) {
            info!(path, "ignoring file, only package.json files are supported");
            return ManifestStatus::NotManifest;
        }

        let location = clone_dir.join(path);
        let classification = match PackageJson::load(&location) {
            Ok(manifest) => manifest.classify(&change.name),
            Err(e) => {
                warn!(path, "verification of dependency failed: {}", e);
                return ManifestStatus::Unreadable {
                    message: e.to_string(),
                };
            }
        };

        if classification == DependencyClassification::None {
            info!(
                path,
                dependency = %change.name,
                "dependency is in neither dependencies nor devDependencies, probably a package with a similar name"
            );
            return ManifestStatus::NotDeclared;
        }

        info!(path, dependency = %change.name, %classification, "bumping dependency");
        match self
            .apply_version(&change.name, &change.version, &location, kind)
            .await
        {
            Ok(()) => ManifestStatus::Updated { classification },
            Err(e) => {
                warn!(path, "dependency installation failed: {}", e);
                ManifestStatus::InstallFailed {
                    classification,
                    message: e.to_string(),
                }
            }
        }
    }
}
