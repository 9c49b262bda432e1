//! Source code analysis module for depcheck.
//!
//! This module turns JavaScript/TypeScript source files into the package
//! names they depend on.
//!
//! # Features
//!
//! - Detect the dialect of a file (JavaScript, JSX, TypeScript, TSX)
//! - Parse ES6 `import`/`export ... from` statements
//! - Parse CommonJS `require()` calls and dynamic `import()`
//! - Recognize TypeScript type-only imports and `import x = require()`
//! - Resolve specifiers to top-level package names
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use depcheck::analysis::{resolve, Dialect, ImportAnalyzer};
//!
//! let mut analyzer = ImportAnalyzer::new()?;
//! let imports = analyzer.analyze_file(Path::new("src/index.js"), Dialect::JavaScript)?;
//!
//! for import in imports {
//!     println!("{} -> {:?}", import.source, resolve(&import.source));
//! }
//! ```

pub mod dialect;
pub mod imports;
pub mod resolver;

// Re-export main types for convenience
pub use dialect::Dialect;
pub use imports::{analyze_file, AnalysisError, AnalysisResult, Import, ImportAnalyzer, ImportKind};
pub use resolver::{is_core_module, resolve, types_package_name, Resolution};
