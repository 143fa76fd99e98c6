//! package.json loading and dependency classification
//!
//! Handles:
//! - dependencies (production)
//! - devDependencies (development)
//! - packageManager (self-declared package manager)

use crate::domain::{DependencyClassification, PackageManagerKind};
use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A parsed package.json object
#[derive(Debug, Clone)]
pub struct PackageJson {
    path: PathBuf,
    root: Map<String, Value>,
}

impl PackageJson {
    /// Parse manifest content; `path` is only used for error messages
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::parse_error(&path, e.to_string()))?;

        match json {
            Value::Object(root) => Ok(Self { path, root }),
            _ => Err(ManifestError::NotAnObject { path }),
        }
    }

    /// Read and parse a manifest from disk
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
        Self::parse(path, &content)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `name` field
    pub fn name(&self) -> Result<&str, ManifestError> {
        self.string_field("name")
    }

    /// The `version` field
    pub fn version(&self) -> Result<&str, ManifestError> {
        self.string_field("version")
    }

    /// How `dependency` is declared in this manifest
    pub fn classify(&self, dependency: &str) -> DependencyClassification {
        classify(&self.root, dependency)
    }

    /// Package manager named by the `packageManager` field, if recognized
    pub fn declared_package_manager(&self) -> Option<PackageManagerKind> {
        self.root
            .get("packageManager")
            .and_then(Value::as_str)
            .and_then(PackageManagerKind::from_declared_field)
    }

    fn string_field(&self, field: &str) -> Result<&str, ManifestError> {
        self.root
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| ManifestError::missing_field(&self.path, field))
    }
}

/// Classify a dependency by exact, case-sensitive name
///
/// A name under `dependencies` is PROD even when it is also under `devDependencies`.
pub fn classify(manifest: &Map<String, Value>, dependency: &str) -> DependencyClassification {
    let declared_in = |section: &str| {
        manifest
            .get(section)
            .and_then(Value::as_object)
            .and_then(|deps| deps.get(dependency))
            .is_some_and(is_declared_spec)
    };

    if declared_in("dependencies") {
        DependencyClassification::Prod
    } else if declared_in("devDependencies") {
        DependencyClassification::Dev
    } else {
        DependencyClassification::None
    }
}

/// An entry counts only when its value is truthy (`""`, `null`, `false` and `0` do not)
fn is_declared_spec(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
