//! Run configuration resolved once from the command line and environment

use crate::cli::CliArgs;
use crate::domain::PackageManagerKind;
use crate::error::ConfigError;
use crate::manifest::MANIFEST_FILENAME;
use crate::vcs::CommitIdentity;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"['"]+"#).unwrap());

/// Split a comma list, trimming entries and removing quotes; empty entries are dropped
pub fn parse_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| QUOTES.replace_all(item.trim(), "").into_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Where the source package directories come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Explicit directories
    Paths(Vec<String>),
    /// Every package.json of the invoking repository, minus ignored paths
    Search { ignore_paths: Vec<String> },
}

impl ManifestSource {
    /// Drop directories containing any ignored fragment
    pub fn filter_search_results(ignore_paths: &[String], dirs: Vec<String>) -> Vec<String> {
        dirs.into_iter()
            .filter(|dir| !ignore_paths.iter().any(|ignored| dir.contains(ignored.as_str())))
            .collect()
    }
}

/// Everything the orchestrator needs, with no further environment access
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: ManifestSource,
    pub local_repo_path: Option<PathBuf>,
    /// Repository names never updated; always contains the invoking repository
    pub ignored_repositories: Vec<String>,
    pub tracking_id: Option<String>,
    pub base_branch: Option<String>,
    pub commit_message_prod: Option<String>,
    pub commit_message_dev: Option<String>,
    pub identity: CommitIdentity,
    pub default_package_manager: PackageManagerKind,
    pub clones_dir: PathBuf,
    pub token: String,
    pub api_url: String,
    pub owner: String,
    pub repo: String,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl RunConfig {
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        let token = non_blank(&args.github_token).ok_or(ConfigError::MissingToken)?;

        let full_name = non_blank(&args.repository).unwrap_or_default();
        let (owner, repo) = match full_name.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                (owner.to_string(), repo.to_string())
            }
            _ => return Err(ConfigError::InvalidRepository { value: full_name }),
        };

        let source = if args.search {
            ManifestSource::Search {
                ignore_paths: parse_comma_list(args.ignore_paths.as_deref().unwrap_or_default()),
            }
        } else {
            let paths = parse_comma_list(&args.packagejson_path);
            if paths.is_empty() {
                return Err(ConfigError::NoManifestPaths);
            }
            ManifestSource::Paths(paths)
        };

        let mut ignored_repositories =
            parse_comma_list(args.repos_to_ignore.as_deref().unwrap_or_default());
        if !ignored_repositories.contains(&repo) {
            ignored_repositories.push(repo.clone());
        }

        Ok(Self {
            source,
            local_repo_path: args.local_repo_path.clone(),
            ignored_repositories,
            tracking_id: non_blank(&args.custom_id),
            base_branch: non_blank(&args.base_branch),
            commit_message_prod: non_blank(&args.commit_message_prod),
            commit_message_dev: non_blank(&args.commit_message_dev),
            identity: CommitIdentity::new(&args.committer_username, &args.committer_email),
            default_package_manager: args.default_package_manager,
            clones_dir: args.clones_dir.clone(),
            token,
            api_url: args.api_url.clone(),
            owner,
            repo,
        })
    }

    /// `owner/name` of the invoking repository
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn is_ignored(&self, repository: &str) -> bool {
        self.ignored_repositories.iter().any(|r| r == repository)
    }

    /// Location of the source package.json for a configured directory
    pub fn source_manifest_path(&self, dir: &str) -> PathBuf {
        let relative = Path::new(dir.trim()).join(MANIFEST_FILENAME);
        match &self.local_repo_path {
            Some(prefix) => prefix.join(relative),
            None => relative,
        }
    }

    /// Working clone location for a repository
    pub fn clone_dir(&self, repository: &str) -> PathBuf {
        self.clones_dir.join(repository)
    }
}
