//! Source dialect detection.
//!
//! A dialect selects the tree-sitter grammar used to extract imports from a
//! file. Detection is by extension, with user overrides taking precedence,
//! and by `#!` sniffing for extensionless scripts.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tree_sitter::Language;

/// Language/module-system variant of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ES modules and CommonJS (`.js`, `.mjs`, `.cjs`).
    JavaScript,
    /// JavaScript with JSX (`.jsx`).
    Jsx,
    /// TypeScript (`.ts`, `.mts`, `.cts`, `.d.ts`).
    TypeScript,
    /// TypeScript with JSX (`.tsx`).
    Tsx,
}

impl Dialect {
    /// Determine the dialect from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Dialect::JavaScript),
            "jsx" => Some(Dialect::Jsx),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Detect the dialect of `path`.
    ///
    /// `overrides` maps extensions (without the leading dot) to dialects and
    /// wins over the built-in table.
    pub fn detect(path: &Path, overrides: &BTreeMap<String, Dialect>) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => overrides
                .get(ext)
                .or_else(|| overrides.get(&ext.to_lowercase()))
                .copied()
                .or_else(|| Self::from_extension(ext)),
            None => Self::sniff(path),
        }
    }

    /// Recognize extensionless node scripts by their shebang line.
    pub fn sniff(path: &Path) -> Option<Self> {
        let file = File::open(path).ok()?;
        let mut first_line = String::new();
        BufReader::new(file).read_line(&mut first_line).ok()?;

        let interpreter = first_line.strip_prefix("#!")?;
        interpreter
            .split_whitespace()
            .any(|word| word == "node" || word.ends_with("/node"))
            .then_some(Dialect::JavaScript)
    }

    /// Get the tree-sitter language for this dialect.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            Dialect::JavaScript | Dialect::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Returns true for TypeScript dialects, where `@types/*` packages apply.
    pub fn is_typescript(&self) -> bool {
        matches!(self, Dialect::TypeScript | Dialect::Tsx)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::JavaScript => "javascript",
            Dialect::Jsx => "jsx",
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" | "es6" | "commonjs" => Ok(Dialect::JavaScript),
            "jsx" => Ok(Dialect::Jsx),
            "typescript" | "ts" => Ok(Dialect::TypeScript),
            "tsx" => Ok(Dialect::Tsx),
            _ => Err(format!(
                "Unknown dialect: '{}'. Valid dialects: javascript, jsx, typescript, tsx",
                s
            )),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
