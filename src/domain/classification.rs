//! Production/development classification of a declared dependency

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a manifest declares the dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DependencyClassification {
    /// Declared under `dependencies`
    Prod,
    /// Declared only under `devDependencies`
    Dev,
    /// Not declared at all
    None,
}

impl DependencyClassification {
    /// Combines manifest-level classifications into a repository-level one
    ///
    /// PROD wins over DEV, DEV wins over NONE.
    pub fn aggregate<I>(classifications: I) -> Self
    where
        I: IntoIterator<Item = DependencyClassification>,
    {
        classifications
            .into_iter()
            .fold(DependencyClassification::None, |acc, next| {
                match (acc, next) {
                    (DependencyClassification::Prod, _) | (_, DependencyClassification::Prod) => {
                        DependencyClassification::Prod
                    }
                    (DependencyClassification::Dev, _) | (_, DependencyClassification::Dev) => {
                        DependencyClassification::Dev
                    }
                    _ => DependencyClassification::None,
                }
            })
    }

    /// Returns true for PROD or DEV
    pub fn is_declared(&self) -> bool {
        !matches!(self, DependencyClassification::None)
    }
}

impl fmt::Display for DependencyClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyClassification::Prod => write!(f, "PROD"),
            DependencyClassification::Dev => write!(f, "DEV"),
            DependencyClassification::None => write!(f, "NONE"),
        }
    }
}
