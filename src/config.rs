//! Options controlling a dependency check.
//!
//! Options can be built in code, loaded from a JSON file (`.depcheckrc.json`
//! or `.depcheckrc` at the project root), and extended by CLI flags.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::Dialect;

/// Paths excluded from every scan, in gitignore syntax.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    ".idea",
    "node_modules",
    "dist",
    "build",
    "bower_components",
    // Images
    "*.png",
    "*.gif",
    "*.jpg",
    "*.jpeg",
    "*.svg",
    // Fonts
    "*.woff",
    "*.woff2",
    "*.eot",
    "*.ttf",
    // Archives
    "*.zip",
    "*.gz",
    // Videos
    "*.mp4",
];

/// Option files looked up at the project root, in order.
pub const CONFIG_FILES: &[&str] = &[".depcheckrc.json", ".depcheckrc"];

/// Errors raised while loading an options file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Options for a dependency check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Gitignore-style patterns of files to skip, added to
    /// [`DEFAULT_IGNORE_PATTERNS`].
    pub ignore_patterns: Vec<String>,
    /// Glob patterns of package names never reported missing or unused.
    pub ignore_matches: Vec<String>,
    /// Skip the calculation of missing dependencies.
    pub skip_missing: bool,
    /// Extension (without the dot) to dialect overrides.
    pub parsers: BTreeMap<String, Dialect>,
    /// Treat installed packages that ship executables as always satisfied.
    pub ignore_bin_package: bool,
    /// Extra gitignore-format file of patterns to skip.
    pub ignore_path: Option<PathBuf>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore_patterns(mut self, ignore_patterns: Vec<String>) -> Self {
        self.ignore_patterns = ignore_patterns;
        self
    }

    pub fn with_ignore_matches(mut self, ignore_matches: Vec<String>) -> Self {
        self.ignore_matches = ignore_matches;
        self
    }

    pub fn with_skip_missing(mut self, skip_missing: bool) -> Self {
        self.skip_missing = skip_missing;
        self
    }

    pub fn with_parser(mut self, extension: impl Into<String>, dialect: Dialect) -> Self {
        let extension = extension.into();
        let extension = extension.trim_start_matches('.').to_string();
        self.parsers.insert(extension, dialect);
        self
    }

    pub fn with_ignore_bin_package(mut self, ignore_bin_package: bool) -> Self {
        self.ignore_bin_package = ignore_bin_package;
        self
    }

    pub fn with_ignore_path(mut self, ignore_path: Option<PathBuf>) -> Self {
        self.ignore_path = ignore_path;
        self
    }

    /// Default patterns followed by the user's additions.
    pub fn all_ignore_patterns(&self) -> impl Iterator<Item = &str> {
        DEFAULT_IGNORE_PATTERNS
            .iter()
            .copied()
            .chain(self.ignore_patterns.iter().map(String::as_str))
    }

    /// Compile `ignore_matches` into a matcher over package names.
    pub fn ignore_matcher(&self) -> Result<GlobSet, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_matches {
            builder.add(Glob::new(pattern)?);
        }
        builder.build()
    }

    /// Fold `other` into `self`: lists extend, flags OR, maps override.
    pub fn merge(mut self, other: Options) -> Self {
        self.ignore_patterns.extend(other.ignore_patterns);
        self.ignore_matches.extend(other.ignore_matches);
        self.skip_missing |= other.skip_missing;
        self.parsers.extend(other.parsers);
        self.ignore_bin_package |= other.ignore_bin_package;
        if other.ignore_path.is_some() {
            self.ignore_path = other.ignore_path;
        }
        self
    }

    /// Load options from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the first options file found at `root`, if any.
    pub fn discover(root: &Path) -> Result<Option<Self>, ConfigError> {
        for name in CONFIG_FILES {
            let path = root.join(name);
            if path.is_file() {
                tracing::debug!("Loading options from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert!(!options.skip_missing);
        assert!(options.ignore_patterns.is_empty());
        assert_eq!(
            options.all_ignore_patterns().count(),
            DEFAULT_IGNORE_PATTERNS.len()
        );
    }

    #[test]
    fn test_ignore_patterns_are_additive() {
        let options = Options::new().with_ignore_patterns(vec!["fixtures".to_string()]);
        let patterns: Vec<_> = options.all_ignore_patterns().collect();

        assert!(patterns.contains(&"node_modules"));
        assert_eq!(patterns.last(), Some(&"fixtures"));
    }

    #[test]
    fn test_ignore_matcher() {
        let options =
            Options::new().with_ignore_matches(vec!["eslint-*".to_string(), "@types/*".to_string()]);
        let matcher = options.ignore_matcher().unwrap();

        assert!(matcher.is_match("eslint-plugin-react"));
        assert!(matcher.is_match("@types/node"));
        assert!(!matcher.is_match("react"));
    }

    #[test]
    fn test_ignore_matcher_invalid_glob() {
        let options = Options::new().with_ignore_matches(vec!["a[".to_string()]);
        assert!(options.ignore_matcher().is_err());
    }

    #[test]
    fn test_with_parser_strips_dot() {
        let options = Options::new().with_parser(".es6", Dialect::JavaScript);
        assert_eq!(options.parsers.get("es6"), Some(&Dialect::JavaScript));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "ignorePatterns": ["fixtures"],
            "ignoreMatches": ["grunt-*"],
            "skipMissing": true,
            "parsers": {"es6": "javascript", "mts": "typescript"},
            "ignoreBinPackage": true
        }"#;
        let options: Options = serde_json::from_str(json).unwrap();

        assert_eq!(options.ignore_patterns, vec!["fixtures"]);
        assert_eq!(options.ignore_matches, vec!["grunt-*"]);
        assert!(options.skip_missing);
        assert!(options.ignore_bin_package);
        assert_eq!(options.parsers.get("mts"), Some(&Dialect::TypeScript));
        assert!(options.ignore_path.is_none());
    }

    #[test]
    fn test_merge() {
        let file = Options::new()
            .with_ignore_matches(vec!["a".to_string()])
            .with_parser("es6", Dialect::JavaScript);
        let flags = Options::new()
            .with_ignore_matches(vec!["b".to_string()])
            .with_skip_missing(true);

        let merged = file.merge(flags);
        assert_eq!(merged.ignore_matches, vec!["a", "b"]);
        assert!(merged.skip_missing);
        assert_eq!(merged.parsers.len(), 1);
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Options::discover(dir.path()).unwrap(), None);

        fs::write(dir.path().join(".depcheckrc"), r#"{"skipMissing": true}"#).unwrap();
        let options = Options::discover(dir.path()).unwrap().unwrap();
        assert!(options.skip_missing);

        fs::write(dir.path().join(".depcheckrc.json"), "{ nope").unwrap();
        assert!(matches!(
            Options::discover(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
