//! Shared types for manifest parsing.
//!
//! This module defines the data structures used to represent a
//! `package.json` manifest and the dependency classes it declares.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An ordered map of declared package names to version constraints.
pub type DepsSet = BTreeMap<String, String>;

/// Represents the structure of a package.json file.
///
/// Only the fields needed for usage analysis are captured; everything
/// else in the manifest is ignored during deserialization.
///
/// # Example
///
/// ```
/// use depcheck::parser::types::PackageJson;
///
/// let json = r#"{"name": "my-app", "dependencies": {"react": "^18.0.0"}}"#;
/// let pkg: PackageJson = serde_json::from_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// assert!(pkg.is_dependency("react"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PackageJson {
    /// The name of the package.
    pub name: Option<String>,

    /// The version of the package (semver format).
    pub version: Option<String>,

    /// A brief description of the package.
    pub description: Option<String>,

    /// Production dependencies required at runtime.
    pub dependencies: Option<DepsSet>,

    /// Development-only dependencies (testing, building, etc.).
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: Option<DepsSet>,

    /// Peer dependencies that the host package must provide.
    #[serde(rename = "peerDependencies")]
    pub peer_dependencies: Option<DepsSet>,

    /// Optional dependencies that enhance functionality if available.
    #[serde(rename = "optionalDependencies")]
    pub optional_dependencies: Option<DepsSet>,

    /// Executables shipped by the package, either a single path or a map.
    pub bin: Option<serde_json::Value>,
}

impl PackageJson {
    /// Returns the declared set for one dependency class (empty if absent).
    pub fn get_dependencies(&self, dep_type: DependencyType) -> &DepsSet {
        static EMPTY: DepsSet = BTreeMap::new();

        let deps = match dep_type {
            DependencyType::Production => &self.dependencies,
            DependencyType::Development => &self.dev_dependencies,
            DependencyType::Peer => &self.peer_dependencies,
            DependencyType::Optional => &self.optional_dependencies,
        };
        deps.as_ref().unwrap_or(&EMPTY)
    }

    pub fn is_dependency(&self, name: &str) -> bool {
        self.get_dependencies(DependencyType::Production)
            .contains_key(name)
    }

    pub fn is_dev_dependency(&self, name: &str) -> bool {
        self.get_dependencies(DependencyType::Development)
            .contains_key(name)
    }

    /// Returns true if `name` is declared in any dependency class.
    pub fn is_any_dependency(&self, name: &str) -> bool {
        DependencyType::ALL
            .iter()
            .any(|dep_type| self.get_dependencies(*dep_type).contains_key(name))
    }

    /// Lists every class that declares `name`, in [`DependencyType::ALL`] order.
    pub fn declared_types(&self, name: &str) -> Vec<DependencyType> {
        DependencyType::ALL
            .iter()
            .copied()
            .filter(|dep_type| self.get_dependencies(*dep_type).contains_key(name))
            .collect()
    }

    /// Returns true if the package declares at least one executable.
    pub fn has_bin(&self) -> bool {
        match &self.bin {
            Some(serde_json::Value::String(path)) => !path.is_empty(),
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            _ => false,
        }
    }

    /// Returns true if the package has any dependencies defined.
    pub fn has_dependencies(&self) -> bool {
        self.dependency_count() > 0
    }

    /// Returns the total count of all dependencies.
    pub fn dependency_count(&self) -> usize {
        DependencyType::ALL
            .iter()
            .map(|dep_type| self.get_dependencies(*dep_type).len())
            .sum()
    }
}

/// Categorizes the type of dependency relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyType {
    /// `dependencies` - required at runtime.
    Production,

    /// `devDependencies` - only needed during development.
    Development,

    /// `peerDependencies` - expected to be provided by the consumer.
    Peer,

    /// `optionalDependencies` - installation continues if they fail.
    Optional,
}

impl DependencyType {
    pub const ALL: [DependencyType; 4] = [
        DependencyType::Production,
        DependencyType::Development,
        DependencyType::Peer,
        DependencyType::Optional,
    ];

    /// Returns a short label for the dependency type.
    pub fn label(&self) -> &'static str {
        match self {
            DependencyType::Production => "prod",
            DependencyType::Development => "dev",
            DependencyType::Peer => "peer",
            DependencyType::Optional => "optional",
        }
    }

    /// Returns true if an unused declaration of this class is reported.
    ///
    /// Peer and optional dependencies are satisfied regardless of usage.
    pub fn reports_unused(&self) -> bool {
        matches!(self, DependencyType::Production | DependencyType::Development)
    }

    /// The manifest key holding this class.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DependencyType::Production => "dependencies",
            DependencyType::Development => "devDependencies",
            DependencyType::Peer => "peerDependencies",
            DependencyType::Optional => "optionalDependencies",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyType::Production => "production",
            DependencyType::Development => "development",
            DependencyType::Peer => "peer",
            DependencyType::Optional => "optional",
        };
        write!(f, "{}", s)
    }
}
