//! Manifest loading, classification and mutation
//!
//! This module provides functionality to:
//! - Load package.json files as JSON objects
//! - Classify how a dependency is declared (PROD/DEV/NONE)
//! - Read the self-declared `packageManager` field
//! - Apply a new dependency version through the installer

mod mutator;
mod package_json;

pub use mutator::ManifestMutator;
pub use package_json::{classify, PackageJson};

use std::path::{Path, PathBuf};

/// The only manifest file name that is classified or mutated
pub const MANIFEST_FILENAME: &str = "package.json";

/// Returns true when the base name of `path` is exactly `package.json`
///
/// Templated variants such as `package.json.hbs` or `template.package.json` are rejected.
pub fn is_manifest_path(path: &str) -> bool {
    let base = path.rsplit('/').next().unwrap_or(path);
    base == MANIFEST_FILENAME
}

/// Directory containing a manifest; the installer runs there
pub fn manifest_dir(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
