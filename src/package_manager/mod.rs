//! Package manager integration for applying a dependency version
//!
//! This module provides:
//! - The installer collaborator and its system implementation
//! - Resolution of the package manager a repository uses

mod resolver;

pub use resolver::{
    DeclaredFieldProbe, PackageManagerProbe, PackageManagerResolver, ProbeContext, TopicProbe,
};

use crate::domain::PackageManagerKind;
use crate::error::InstallError;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Trait for running package manager add commands
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install `name@version` as a dependency of the project in `cwd`
    async fn install(
        &self,
        name: &str,
        version: &str,
        cwd: &Path,
        kind: PackageManagerKind,
    ) -> Result<(), InstallError>;
}

/// Installer that executes the real package manager binaries
#[derive(Debug, Default)]
pub struct SystemInstaller;

impl SystemInstaller {
    /// Create a new system installer
    pub fn new() -> Self {
        Self
    }

    /// Get the add command for a package manager
    ///
    /// Every supported manager accepts `add <name>@<version>`; unknown falls back to npm.
    pub fn install_command(kind: PackageManagerKind, name: &str, version: &str) -> Vec<String> {
        let binary = kind.or(PackageManagerKind::Npm).as_str();
        vec![
            binary.to_string(),
            "add".to_string(),
            format!("{}@{}", name, version),
        ]
    }
}

#[async_trait]
impl Installer for SystemInstaller {
    async fn install(
        &self,
        name: &str,
        version: &str,
        cwd: &Path,
        kind: PackageManagerKind,
    ) -> Result<(), InstallError> {
        let command = Self::install_command(kind, name, version);
        let command_str = command.join(" ");
        debug!(command = %command_str, cwd = %cwd.display(), "running package manager");

        let output = Command::new(&command[0])
            .args(&command[1..])
            .current_dir(cwd)
            .output()
            .await
            .map_err(|source| InstallError::Spawn {
                command: command_str.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        Err(InstallError::ExitStatus {
            command: command_str,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
