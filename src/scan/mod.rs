//! Source discovery.
//!
//! Walks a project directory and yields the files worth analyzing, after
//! applying the default exclusions, user patterns and ignore files.

pub mod scanner;

pub use scanner::{scan, IgnoreRules, Scanner, SourceFile};
