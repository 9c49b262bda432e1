//! Dependency checking.
//!
//! Ties the stages together: the scanner finds source files, the analyzer
//! extracts their imports in parallel, the expander credits dependency
//! names and the reconciler compares them with the manifest.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use depcheck::check::depcheck;
//! use depcheck::config::Options;
//!
//! let outcome = depcheck(Path::new("."), &Options::default())?;
//! for name in &outcome.report.unused_dependencies {
//!     println!("unused: {}", name);
//! }
//! ```

pub mod cancel;
pub mod checker;
pub mod expand;
pub mod reconcile;
pub mod report;

pub use cancel::CancellationToken;
pub use checker::{depcheck, Checker};
pub use expand::UsageExpander;
pub use reconcile::{reconcile, Usages};
pub use report::{CheckOutcome, FileParseWarning, FilesByPackage, Report};
