//! depcheck - Find unused and missing dependencies in JavaScript and TypeScript projects
//!
//! This crate scans a project's source files, extracts every statically
//! known import, and cross-references the imported packages with the
//! dependencies declared in `package.json`.

pub mod analysis;
pub mod check;
pub mod config;
pub mod error;
pub mod export;
pub mod parser;
pub mod scan;

pub use check::{depcheck, CancellationToken, CheckOutcome, Checker, FileParseWarning, Report};
pub use config::Options;
pub use error::{DepcheckError, Result};
