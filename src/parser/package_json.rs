//! Parser for npm package.json files.
//!
//! This module reads the project manifest and the manifests of installed
//! packages under `node_modules`.

use std::fs;
use std::path::Path;

use super::types::PackageJson;

/// File name of an npm manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Errors that can occur during package.json parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a package.json file from a file path.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use depcheck::parser::package_json::parse_file;
///
/// let pkg = parse_file(Path::new("package.json")).unwrap();
/// println!("Package: {:?}", pkg.name);
/// ```
pub fn parse_file(path: &Path) -> ParseResult<PackageJson> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a package.json from a string.
///
/// # Example
///
/// ```
/// use depcheck::parser::package_json::parse_str;
///
/// let json = r#"{"name": "my-app", "version": "1.0.0"}"#;
/// let pkg = parse_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
pub fn parse_str(content: &str) -> ParseResult<PackageJson> {
    let pkg: PackageJson = serde_json::from_str(content)?;
    Ok(pkg)
}

/// Loads the manifest of the package rooted at `dir`.
pub fn load_module(dir: &Path) -> ParseResult<PackageJson> {
    parse_file(&dir.join(MANIFEST_FILE))
}

/// Returns true if `dir` is a package root (contains its own manifest).
pub fn is_module(dir: &Path) -> bool {
    dir.join(MANIFEST_FILE).is_file()
}

/// Loads the manifest of an installed package from `<root>/node_modules/<name>`.
///
/// Returns `None` when the package is not installed or its manifest is
/// unreadable; installed manifests are advisory only.
pub fn load_installed(root: &Path, name: &str) -> Option<PackageJson> {
    let dir = root.join("node_modules").join(name);
    match load_module(&dir) {
        Ok(pkg) => Some(pkg),
        Err(ParseError::IoError(_)) => None,
        Err(e) => {
            tracing::debug!("Ignoring unreadable manifest of {}: {}", name, e);
            None
        }
    }
}
