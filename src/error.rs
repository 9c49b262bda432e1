//! Fatal errors of a dependency check.
//!
//! Problems with individual source files are not errors; they are collected
//! as [`crate::check::FileParseWarning`]s on the outcome.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::parser::ParseError;

#[derive(Debug, Error)]
pub enum DepcheckError {
    /// The project directory does not exist or is not a directory.
    #[error("Project directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The project manifest is missing or malformed.
    #[error("Failed to load manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// An ignore pattern or ignore-match glob does not compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// An options file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for dependency checks.
pub type Result<T> = std::result::Result<T, DepcheckError>;
