//! Manifest loading for depcheck.
//!
//! This module reads `package.json` files: the project manifest that
//! declares dependencies, and the manifests of installed packages that are
//! consulted for `bin` entries and transitive peer/optional declarations.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use depcheck::parser::{load_module, DependencyType};
//!
//! let pkg = load_module(Path::new(".")).unwrap();
//! let prod = pkg.get_dependencies(DependencyType::Production);
//!
//! println!("Found {} production dependencies", prod.len());
//! ```

pub mod package_json;
pub mod types;

// Re-export commonly used types for convenience
pub use package_json::{
    is_module, load_installed, load_module, parse_file, parse_str, ParseError, ParseResult,
    MANIFEST_FILE,
};

pub use types::{DependencyType, DepsSet, PackageJson};
