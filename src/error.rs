//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: manifest files that cannot be read or parsed
//! - ForgeError: GitHub API communication failures
//! - VcsError: clone/branch/push failures
//! - InstallError: package manager invocation failures
//! - SetupError: working clone preparation failures
//! - PublishError: pull request creation failures
//! - CompensationError: cleanup after a partial publish failed
//! - ConfigError: invalid configuration at the process boundary

use crate::domain::FailureStage;
use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// GitHub API related errors
    #[error(transparent)]
    Forge(#[from] ForgeError),

    /// Version control related errors
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest content is not valid JSON
    #[error("failed to parse JSON in {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Manifest parsed but is not a JSON object
    #[error("manifest {path} is not a JSON object")]
    NotAnObject { path: PathBuf },

    /// A required field is absent or not a string
    #[error("manifest {path} has no string field '{field}'")]
    MissingField { path: PathBuf, field: String },
}

/// Errors related to GitHub API communication
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Request could not be sent or the connection failed
    #[error("request to {endpoint} failed: {message}")]
    Network { endpoint: String, message: String },

    /// Non-success HTTP status
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {endpoint}")]
    RateLimited { endpoint: String },

    /// Response body did not have the expected shape
    #[error("invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    /// GraphQL reported errors
    #[error("GraphQL error: {}", messages.join("; "))]
    GraphQl { messages: Vec<String> },
}

/// Errors related to version control operations
#[derive(Error, Debug)]
pub enum VcsError {
    /// git could not be started
    #[error("failed to execute git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// git exited with a non-zero status
    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Errors related to package manager invocation
#[derive(Error, Debug)]
pub enum InstallError {
    /// Package manager binary could not be started
    #[error("failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Package manager exited with a non-zero status
    #[error("{command} exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Working clone could not be prepared
#[derive(Error, Debug)]
pub enum SetupError {
    /// Clone at the base branch failed
    #[error("clone failed: {0}")]
    Clone(#[source] VcsError),

    /// Working branch could not be created
    #[error("branch creation failed: {0}")]
    CreateBranch(#[source] VcsError),
}

/// Pull request could not be opened after a successful push
#[derive(Error, Debug)]
#[error("opening pull request from {branch} failed: {source}")]
pub struct PublishError {
    pub branch: String,
    #[source]
    pub source: ForgeError,
}

/// Orphaned remote branch could not be removed
#[derive(Error, Debug)]
#[error("could not remove remote branch {branch}: {source}")]
pub struct CompensationError {
    pub branch: String,
    #[source]
    pub source: VcsError,
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No token supplied
    #[error("a GitHub token is required (--github-token or GITHUB_TOKEN)")]
    MissingToken,

    /// Repository is not in owner/name form
    #[error("invalid repository '{value}': expected 'owner/name'")]
    InvalidRepository { value: String },

    /// Source package version is not semver
    #[error("invalid version '{value}' for {package}: {message}")]
    InvalidVersion {
        package: String,
        value: String,
        message: String,
    },

    /// Nothing to process
    #[error("no manifest paths to process")]
    NoManifestPaths,
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new MissingField error
    pub fn missing_field(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        ManifestError::MissingField {
            path: path.into(),
            field: field.into(),
        }
    }
}

impl ForgeError {
    /// Creates a new Network error
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ForgeError::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ForgeError::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

impl SetupError {
    /// Failure stage recorded in the repository outcome
    pub fn stage(&self) -> FailureStage {
        match self {
            SetupError::Clone(_) => FailureStage::Clone,
            SetupError::CreateBranch(_) => FailureStage::CreateBranch,
        }
    }
}

impl VcsError {
    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        VcsError::CommandFailed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }
}
