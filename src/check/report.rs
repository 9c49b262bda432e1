//! Check results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Package name → sorted relative paths of the files using it.
pub type FilesByPackage = BTreeMap<String, Vec<String>>;

/// The categorized result of reconciling usages against a manifest.
///
/// Serializes to exactly four keys, in this order. Every list is sorted,
/// so two reports over the same tree compare (and serialize) identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Used packages that no dependency class declares.
    pub missing_dependencies: FilesByPackage,
    /// `dependencies` entries that nothing uses.
    pub unused_dependencies: Vec<String>,
    /// `devDependencies` entries that nothing uses.
    pub unused_dev_dependencies: Vec<String>,
    /// Declared packages with at least one using file.
    pub using_dependencies: FilesByPackage,
}

impl Report {
    /// True when nothing is missing or unused.
    pub fn is_clean(&self) -> bool {
        self.missing_dependencies.is_empty()
            && self.unused_dependencies.is_empty()
            && self.unused_dev_dependencies.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A source file that could not be analyzed. The run continues without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileParseWarning {
    /// Path relative to the project root.
    pub file: String,
    pub message: String,
}

impl FileParseWarning {
    pub fn new(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FileParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Everything a check produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub report: Report,
    /// Per-file failures, in walk order.
    pub warnings: Vec<FileParseWarning>,
    /// Set when cancellation stopped the run before every file was analyzed.
    pub incomplete: bool,
    /// Number of files whose imports made it into the report.
    pub files_analyzed: usize,
    /// `name` from the project manifest.
    pub project_name: Option<String>,
    /// `version` from the project manifest.
    pub project_version: Option<String>,
}
