//! CLI argument parsing module for orgbump

use crate::domain::PackageManagerKind;
use clap::Parser;
use std::path::PathBuf;

/// Bump a dependency's version across every repository of an organization
#[derive(Parser, Debug, Clone)]
#[command(
    name = "orgbump",
    version,
    about = "Bump a dependency's version across every repository of an organization"
)]
pub struct CliArgs {
    // Source packages
    /// Comma-separated directories containing the package.json of the dependency to bump
    #[arg(long, env = "PACKAGE_JSON_LOC", default_value = "./")]
    pub packagejson_path: String,

    /// Find every package.json of the invoking repository instead of using --packagejson-path
    #[arg(long, env = "SEARCH")]
    pub search: bool,

    /// Comma-separated path fragments excluded in search mode
    #[arg(long, env = "IGNORE_PATHS")]
    pub ignore_paths: Option<String>,

    /// Prefix for source package.json paths
    #[arg(long, env = "LOCAL_REPO_PATH")]
    pub local_repo_path: Option<PathBuf>,

    // Target repositories
    /// Comma-separated repository names that are never updated
    #[arg(long)]
    pub repos_to_ignore: Option<String>,

    /// Identifier embedded in pull requests so later runs update them instead of opening new ones
    #[arg(long, env = "CUSTOM_ID")]
    pub custom_id: Option<String>,

    /// Base branch for new pull requests (default: each repository's default branch)
    #[arg(long)]
    pub base_branch: Option<String>,

    /// Commit message when the dependency is a production dependency
    #[arg(long)]
    pub commit_message_prod: Option<String>,

    /// Commit message when the dependency is a development dependency
    #[arg(long)]
    pub commit_message_dev: Option<String>,

    /// Committer name
    #[arg(long, default_value = "web-flow")]
    pub committer_username: String,

    /// Committer email
    #[arg(long, default_value = "noreply@github.com")]
    pub committer_email: String,

    /// Package manager used when a repository declares none
    #[arg(long, default_value = "npm")]
    pub default_package_manager: PackageManagerKind,

    /// Directory repositories are cloned into
    #[arg(long, default_value = "./clones")]
    pub clones_dir: PathBuf,

    // GitHub
    /// Token used for the API and for git pushes
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Invoking repository as owner/name; its owner scopes the search
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = crate::github::DEFAULT_API_URL)]
    pub api_url: String,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}
