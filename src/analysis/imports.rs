//! Import extraction using tree-sitter for JavaScript/TypeScript.
//!
//! This module parses source files and collects every statically known
//! module specifier: ES imports and re-exports, `require()` calls, dynamic
//! `import()` and the TypeScript-only import forms.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree, TreeCursor};

use super::dialect::Dialect;
use crate::scan::SourceFile;

/// Errors that can occur during import analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse file: {path}")]
    ParseError { path: String },

    #[error("Syntax error at line {line}, column {column}")]
    SyntaxError { line: usize, column: usize },

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The syntactic form an import was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// ES6 import statement: `import ... from 'module'` or `import 'module'`
    ES6,
    /// Re-export: `export * from 'module'`, `export { x } from 'module'`
    ReExport,
    /// CommonJS: `require('module')`, `require.resolve('module')`,
    /// `import x = require('module')`
    CommonJS,
    /// Dynamic import: `import('module')`
    DynamicImport,
    /// Type-only import or re-export: `import type { T } from 'module'`
    TypeOnly,
}

/// A single import reference found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The raw specifier (e.g., "react", "./utils", "@scope/package/sub")
    pub source: String,
    /// The kind of import
    pub kind: ImportKind,
    /// Line number in the source file (1-indexed)
    pub line: usize,
}

impl Import {
    /// Returns true if this import is only visible to the type checker.
    pub fn is_type_only(&self) -> bool {
        self.kind == ImportKind::TypeOnly
    }
}

/// Analyzer for extracting imports from JavaScript/TypeScript source files.
///
/// Holds one parser per grammar; parsers are stateful, so an analyzer is
/// owned by a single worker at a time.
pub struct ImportAnalyzer {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl ImportAnalyzer {
    /// Create a new ImportAnalyzer.
    pub fn new() -> AnalysisResult<Self> {
        Ok(Self {
            js_parser: Self::parser_for(Dialect::JavaScript)?,
            ts_parser: Self::parser_for(Dialect::TypeScript)?,
            tsx_parser: Self::parser_for(Dialect::Tsx)?,
        })
    }

    fn parser_for(dialect: Dialect) -> AnalysisResult<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&dialect.tree_sitter_language())
            .map_err(|_| AnalysisError::LanguageInit)?;
        Ok(parser)
    }

    /// Analyze a single file and extract all imports.
    pub fn analyze_file(&mut self, path: &Path, dialect: Dialect) -> AnalysisResult<Vec<Import>> {
        let content = fs::read_to_string(path)?;
        self.analyze_source(&content, dialect, path)
    }

    /// Extract the imports of a scanned source file, using its detected dialect.
    pub fn extract(&mut self, file: &SourceFile) -> AnalysisResult<Vec<Import>> {
        let content = file.read()?;
        self.analyze_source(&content, file.dialect, &file.path)
    }

    /// Analyze source code directly.
    ///
    /// Fails with [`AnalysisError::SyntaxError`] if the source does not
    /// parse cleanly; partial trees are never mined for imports. Legacy
    /// `assert { ... }` import assertions are read as `with { ... }`
    /// attributes.
    pub fn analyze_source(
        &mut self,
        source: &str,
        dialect: Dialect,
        path: &Path,
    ) -> AnalysisResult<Vec<Import>> {
        let tree = Self::parse_tree(self.parser_mut(dialect), source, path)?;
        if !tree.root_node().has_error() {
            return Ok(self.extract_imports(&tree, source));
        }

        if let Some(rewritten) = rewrite_import_assertions(source) {
            let retry = Self::parse_tree(self.parser_mut(dialect), &rewritten, path)?;
            if !retry.root_node().has_error() {
                return Ok(self.extract_imports(&retry, &rewritten));
            }
        }

        let root = tree.root_node();
        let position = first_error(root)
            .map(|node| node.start_position())
            .unwrap_or_else(|| root.start_position());
        Err(AnalysisError::SyntaxError {
            line: position.row + 1,
            column: position.column + 1,
        })
    }

    fn parser_mut(&mut self, dialect: Dialect) -> &mut Parser {
        match dialect {
            Dialect::JavaScript | Dialect::Jsx => &mut self.js_parser,
            Dialect::TypeScript => &mut self.ts_parser,
            Dialect::Tsx => &mut self.tsx_parser,
        }
    }

    fn parse_tree(parser: &mut Parser, source: &str, path: &Path) -> AnalysisResult<Tree> {
        parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::ParseError {
                path: path.display().to_string(),
            })
    }

    /// Extract imports from a parsed tree.
    fn extract_imports(&self, tree: &Tree, source: &str) -> Vec<Import> {
        let mut imports = Vec::new();
        let mut cursor = tree.walk();

        self.visit_node(&mut cursor, source, &mut imports);

        imports
    }

    /// Recursively visit nodes to find imports.
    fn visit_node(&self, cursor: &mut TreeCursor, source: &str, imports: &mut Vec<Import>) {
        let node = cursor.node();

        let found = match node.kind() {
            "import_statement" => self.parse_import_statement(&node, source),
            "export_statement" => self.parse_reexport(&node, source),
            "call_expression" => self.parse_require_or_dynamic_import(&node, source),
            _ => None,
        };
        if let Some(import) = found {
            imports.push(import);
        }

        if cursor.goto_first_child() {
            loop {
                self.visit_node(cursor, source, imports);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
    }

    /// Parse an import statement, including `import x = require('...')`.
    fn parse_import_statement(&self, node: &Node, source: &str) -> Option<Import> {
        let line = node.start_position().row + 1;
        let type_only = has_type_keyword(node);

        if let Some(source_node) = node.child_by_field_name("source") {
            let kind = if type_only {
                ImportKind::TypeOnly
            } else {
                ImportKind::ES6
            };
            return self.import_from(&source_node, source, kind, line);
        }

        let mut cursor = node.walk();
        let clause = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == "import_require_clause")?;

        let mut clause_cursor = clause.walk();
        let source_node = clause
            .named_children(&mut clause_cursor)
            .find(|child| child.kind() == "string")?;
        let kind = if type_only {
            ImportKind::TypeOnly
        } else {
            ImportKind::CommonJS
        };
        self.import_from(&source_node, source, kind, line)
    }

    /// Parse `export ... from '...'`; local exports carry no source.
    fn parse_reexport(&self, node: &Node, source: &str) -> Option<Import> {
        let source_node = node.child_by_field_name("source")?;
        let kind = if has_type_keyword(node) {
            ImportKind::TypeOnly
        } else {
            ImportKind::ReExport
        };
        self.import_from(&source_node, source, kind, node.start_position().row + 1)
    }

    /// Parse require() calls, dynamic import() and TypeScript import types.
    ///
    /// Only the first argument is inspected, and only when it is a constant
    /// string; computed specifiers cannot be resolved statically.
    fn parse_require_or_dynamic_import(&self, node: &Node, source: &str) -> Option<Import> {
        let func_node = node.child_by_field_name("function")?;

        let kind = if func_node.kind() == "import" {
            if in_type_position(node) {
                ImportKind::TypeOnly
            } else {
                ImportKind::DynamicImport
            }
        } else {
            match self.node_text(&func_node, source)? {
                "require" | "require.resolve" => ImportKind::CommonJS,
                _ => return None,
            }
        };

        let args_node = node.child_by_field_name("arguments")?;
        let mut args_cursor = args_node.walk();
        let first_arg = args_node
            .named_children(&mut args_cursor)
            .find(|child| child.kind() != "comment")?;

        self.import_from(&first_arg, source, kind, node.start_position().row + 1)
    }

    fn import_from(
        &self,
        node: &Node,
        source: &str,
        kind: ImportKind,
        line: usize,
    ) -> Option<Import> {
        let specifier = self.literal_value(node, source)?;
        if specifier.is_empty() {
            return None;
        }
        Some(Import {
            source: specifier,
            kind,
            line,
        })
    }

    /// Extract the text content of a node.
    fn node_text<'a>(&self, node: &Node, source: &'a str) -> Option<&'a str> {
        source.get(node.start_byte()..node.end_byte())
    }

    /// Value of a constant string or substitution-free template literal.
    fn literal_value(&self, node: &Node, source: &str) -> Option<String> {
        match node.kind() {
            "string" => {}
            "template_string" => {
                let mut cursor = node.walk();
                let has_substitution = node
                    .named_children(&mut cursor)
                    .any(|child| child.kind() == "template_substitution");
                if has_substitution {
                    return None;
                }
            }
            _ => return None,
        }

        let text = self.node_text(node, source)?;
        // Remove quotes (single, double, or backticks)
        let trimmed = text
            .trim_start_matches(['"', '\'', '`'])
            .trim_end_matches(['"', '\'', '`']);
        Some(trimmed.to_string())
    }
}

/// `import type`, `import typeof` and `export type` carry an anonymous
/// keyword token directly under the statement.
fn has_type_keyword(node: &Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && matches!(child.kind(), "type" | "typeof"));
    found
}

/// Node kinds that only occur in TypeScript type positions.
const TYPE_CONTEXTS: &[&str] = &[
    "type_annotation",
    "type_alias_declaration",
    "type_query",
    "type_arguments",
    "type_parameters",
    "interface_declaration",
    "implements_clause",
    "extends_type_clause",
    "opting_type_annotation",
    "omitting_type_annotation",
    "adding_type_annotation",
    "asserts_annotation",
    "type_predicate_annotation",
];

/// `import('x')` under a type (`let v: import('x').T`) names a module
/// for the type checker only.
fn in_type_position(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if TYPE_CONTEXTS.contains(&parent.kind()) {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Rewrite `'x' assert {` after a module specifier to `'x' with   {`.
///
/// The replacement keeps every byte offset, so positions in the rewritten
/// tree match the original text. Returns `None` when nothing was rewritten.
fn rewrite_import_assertions(source: &str) -> Option<String> {
    const KEYWORD: &str = "assert";
    const REPLACEMENT: &str = "with  ";

    let mut rewritten: Option<String> = None;
    let mut from = 0;
    while let Some(offset) = source[from..].find(KEYWORD) {
        let start = from + offset;
        let end = start + KEYWORD.len();
        from = end;

        let follows_specifier = source[..start].trim_end().ends_with(['\'', '"']);
        let opens_object = source[end..].trim_start().starts_with('{');
        if follows_specifier && opens_object {
            rewritten
                .get_or_insert_with(|| source.to_string())
                .replace_range(start..end, REPLACEMENT);
        }
    }
    rewritten
}

/// Locate the first ERROR or MISSING node, for warning positions.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

/// Analyze a single file and return its imports.
pub fn analyze_file(path: &Path, dialect: Dialect) -> AnalysisResult<Vec<Import>> {
    let mut analyzer = ImportAnalyzer::new()?;
    analyzer.analyze_file(path, dialect)
}
