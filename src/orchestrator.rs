//! Orchestrator driving a bump across every dependent repository
//!
//! This module provides:
//! - Workflow coordination: source package → discovery → per repository
//!   reconcile → resolve → mutate → publish
//! - Ignore list enforcement
//! - Error isolation: one repository's failure never stops the others
//!
//! Repositories are processed sequentially; each working clone lives under
//! `clones_dir/<repository name>` and is reset before use.

use crate::config::{ManifestSource, RunConfig};
use crate::domain::{
    DependencyChange, DependencyClassification, FailureStage, ManifestReport, Outcome, PackageRun,
    RepositoryOutcome, RepositoryTarget, RunReport, SkipReason,
};
use crate::error::{AppError, ConfigError, ForgeError};
use crate::github::{ForgeClient, GitHubClient, HttpClient};
use crate::manifest::{ManifestMutator, PackageJson};
use crate::package_manager::{Installer, PackageManagerResolver, ProbeContext, SystemInstaller};
use crate::progress::Progress;
use crate::publisher::PublishCoordinator;
use crate::reconciler::{BranchReconciler, WorkingClone};
use crate::vcs::{GitCli, VersionControl};
use std::io;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

pub struct Orchestrator {
    config: RunConfig,
    forge: Arc<dyn ForgeClient>,
    reconciler: BranchReconciler,
    resolver: PackageManagerResolver,
    mutator: ManifestMutator,
    publisher: PublishCoordinator,
    show_progress: bool,
}

impl Orchestrator {
    /// Create an orchestrator talking to GitHub, git and the system package managers
    pub fn new(config: RunConfig) -> Result<Self, ForgeError> {
        let http = HttpClient::new(&config.api_url, &config.token)?;
        let forge = Arc::new(GitHubClient::new(http));
        let vcs = Arc::new(GitCli::new(config.token.clone()));
        let installer = Arc::new(SystemInstaller::new());
        Ok(Self::with_collaborators(config, forge, vcs, installer))
    }

    /// Create an orchestrator with custom collaborators
    pub fn with_collaborators(
        config: RunConfig,
        forge: Arc<dyn ForgeClient>,
        vcs: Arc<dyn VersionControl>,
        installer: Arc<dyn Installer>,
    ) -> Self {
        let publisher = PublishCoordinator::new(
            forge.clone(),
            vcs.clone(),
            config.identity.clone(),
            config.tracking_id.clone(),
        );
        Self {
            reconciler: BranchReconciler::new(forge.clone(), vcs),
            resolver: PackageManagerResolver::default(),
            mutator: ManifestMutator::with_fallback(installer, config.default_package_manager),
            publisher,
            forge,
            config,
            show_progress: false,
        }
    }

    /// Show a progress bar over the repositories of each package run
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run every configured source package, one after another
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::new();

        let dirs = match self.source_dirs().await {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!("listing package.json files of {} failed: {}", self.config.full_name(), e);
                report.add_package(PackageRun::start(self.config.full_name()).fail(e.to_string()));
                return report;
            }
        };

        if dirs.is_empty() {
            info!("no package.json to process");
        }

        for dir in dirs {
            self.clear_clones_dir().await;
            report.add_package(self.run_for_package(&dir).await);
        }

        report
    }

    async fn source_dirs(&self) -> Result<Vec<String>, ForgeError> {
        match &self.config.source {
            ManifestSource::Paths(paths) => Ok(paths.clone()),
            ManifestSource::Search { ignore_paths } => {
                let dirs = self
                    .forge
                    .search_manifest_dirs(&self.config.full_name())
                    .await?;
                Ok(ManifestSource::filter_search_results(ignore_paths, dirs))
            }
        }
    }

    async fn clear_clones_dir(&self) {
        match tokio::fs::remove_dir_all(&self.config.clones_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                dir = %self.config.clones_dir.display(),
                "could not clean up clones directory: {}", e
            ),
        }
    }

    /// Dependency name, version and commit templates from the source package
    pub fn load_change(&self, dir: &str) -> Result<DependencyChange, AppError> {
        let path = self.config.source_manifest_path(dir);
        info!(path = %path.display(), "reading source package.json");

        let manifest = PackageJson::load(&path)?;
        let name = manifest.name()?;
        let version = manifest.version()?;
        semver::Version::parse(version).map_err(|e| ConfigError::InvalidVersion {
            package: name.to_string(),
            value: version.to_string(),
            message: e.to_string(),
        })?;

        Ok(DependencyChange::new(name, version).with_commit_messages(
            self.config.commit_message_prod.clone(),
            self.config.commit_message_dev.clone(),
        ))
    }

    /// Bump one source package in every dependent repository
    pub async fn run_for_package(&self, dir: &str) -> PackageRun {
        let mut run = PackageRun::start(dir);

        let change = match self.load_change(dir) {
            Ok(change) => change,
            Err(e) => {
                warn!("{}", e);
                return run.fail(e.to_string());
            }
        };
        run.dependency = Some(change.name.clone());
        run.version = Some(change.version.clone());
        info!(
            dependency = %change.name,
            version = %change.version,
            "bumping dependency in dependent projects"
        );

        let targets = match self
            .forge
            .search_dependents(&change.name, &self.config.owner)
            .await
        {
            Ok(targets) => targets,
            Err(e) => {
                warn!("getting list of repositories to process failed: {}", e);
                return run.fail(e.to_string());
            }
        };

        if targets.is_empty() {
            info!(
                dependency = %change.name,
                "no dependents found in {}, nothing to bump", self.config.owner
            );
            return run.finish();
        }

        info!(
            count = targets.len(),
            ignored = ?self.config.ignored_repositories,
            "processing repositories"
        );
        run.repositories = self.process_repositories(&targets, &change).await;
        run.finish()
    }

    /// Process targets in discovery order, collecting one outcome each
    pub async fn process_repositories(
        &self,
        targets: &[RepositoryTarget],
        change: &DependencyChange,
    ) -> Vec<RepositoryOutcome> {
        let mut progress = Progress::new(self.show_progress);
        progress.start(targets.len() as u64, "Updating repositories");

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            progress.set_message(target.name());
            let span = info_span!("repository", repository = %target.name());
            let outcome = self.process_repository(target, change).instrument(span).await;
            outcomes.push(outcome);
            progress.inc();
        }

        progress.finish_and_clear();
        outcomes
    }

    async fn process_repository(
        &self,
        target: &RepositoryTarget,
        change: &DependencyChange,
    ) -> RepositoryOutcome {
        let name = target.name();
        let url = target.identity.html_url.as_str();
        let failed = |stage: FailureStage, message: String| {
            RepositoryOutcome::new(name, url, Outcome::failed(stage, message))
        };

        if self.config.is_ignored(name) {
            info!("repository is in the ignore list, skipping");
            return RepositoryOutcome::new(name, url, Outcome::skipped(SkipReason::Ignored));
        }

        let owner = self.config.owner.as_str();
        let existing = match self
            .reconciler
            .find_existing_branch(owner, name, self.config.tracking_id.as_deref())
            .await
        {
            Ok(existing) => existing,
            Err(e) => {
                warn!("looking up existing pull request failed: {}", e);
                return failed(FailureStage::Reconcile, e.to_string());
            }
        };

        let metadata = match self.forge.repository_metadata(owner, name).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("fetching repository metadata failed: {}", e);
                return failed(FailureStage::Metadata, e.to_string());
            }
        };

        let plan = BranchReconciler::plan(
            existing,
            self.config.base_branch.as_deref(),
            &metadata.default_branch,
            change,
        );
        let clone = match self
            .reconciler
            .prepare(target, plan, self.config.clone_dir(name))
            .await
        {
            Ok(clone) => clone,
            Err(e) => {
                warn!("{}", e);
                return failed(e.stage(), e.to_string());
            }
        };

        let kind = self.resolver.resolve(&ProbeContext {
            topic_label: metadata.package_manager,
            clone_dir: &clone.dir,
            manifest_paths: &target.manifest_paths,
        });
        let effective = self.mutator.effective_kind(kind);
        info!(
            files = target.manifest_paths.len(),
            package_manager = %effective,
            "installing dependency"
        );

        let manifests = self
            .mutator
            .apply_to_repository(&clone.dir, &target.manifest_paths, change, kind)
            .await;
        let outcome = self.finalize(target, &clone, change, &manifests).await;

        RepositoryOutcome {
            package_manager: Some(effective),
            manifests,
            ..RepositoryOutcome::new(name, url, outcome)
        }
    }

    /// Pick the commit message from the updated manifests and publish
    async fn finalize(
        &self,
        target: &RepositoryTarget,
        clone: &WorkingClone,
        change: &DependencyChange,
        manifests: &[ManifestReport],
    ) -> Outcome {
        let declared = DependencyClassification::aggregate(
            manifests.iter().map(ManifestReport::classification),
        );
        if !declared.is_declared() {
            info!("no manifest declares the dependency, nothing to publish");
            return Outcome::skipped(SkipReason::NoApplicableChange);
        }

        let updated = DependencyClassification::aggregate(
            manifests
                .iter()
                .filter(|m| m.is_updated())
                .map(ManifestReport::classification),
        );
        if !updated.is_declared() {
            let message = "dependency installation failed in every manifest";
            warn!("{}", message);
            return Outcome::failed(FailureStage::Mutate, message);
        }

        self.publisher
            .publish(target, clone, change.commit_message(updated))
            .await
    }
}
