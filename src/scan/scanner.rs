//! Project traversal.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use tracing::{debug, trace, warn};

use crate::analysis::Dialect;
use crate::config::Options;
use crate::error::{DepcheckError, Result};
use crate::parser::is_module;

/// Per-directory ignore file honored next to `.gitignore`.
pub const DEPCHECK_IGNORE_FILE: &str = ".depcheckignore";

/// A file selected for import extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as walked (under the canonical project root).
    pub path: PathBuf,
    /// Path relative to the project root, `/`-separated.
    pub relative_path: String,
    pub dialect: Dialect,
}

impl SourceFile {
    /// Read the file's text.
    pub fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

/// Exclusion rules supplied through options.
///
/// The default and user patterns become negated walker overrides;
/// `ignore_path` is an extra gitignore-format file rooted at the project.
/// Ignore files found in the tree are handled by the walk itself.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    overrides: Override,
    extra: Option<Gitignore>,
}

impl IgnoreRules {
    pub fn build(root: &Path, options: &Options) -> Result<Self> {
        let mut overrides = OverrideBuilder::new(root);
        for pattern in options.all_ignore_patterns() {
            overrides
                .add(&format!("!{}", pattern))
                .map_err(|err| DepcheckError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: err.to_string(),
                })?;
        }
        let overrides = overrides.build().map_err(|err| DepcheckError::InvalidPattern {
            pattern: "<ignorePatterns>".to_string(),
            message: err.to_string(),
        })?;

        let extra = match &options.ignore_path {
            Some(ignore_path) => Some(Self::ignore_file(root, ignore_path)?),
            None => None,
        };

        Ok(Self { overrides, extra })
    }

    fn ignore_file(root: &Path, ignore_path: &Path) -> Result<Gitignore> {
        let path = if ignore_path.is_absolute() {
            ignore_path.to_path_buf()
        } else {
            root.join(ignore_path)
        };
        let invalid = |message: String| DepcheckError::InvalidPattern {
            pattern: path.display().to_string(),
            message,
        };

        let mut builder = GitignoreBuilder::new(root);
        if let Some(err) = builder.add(&path) {
            return Err(invalid(err.to_string()));
        }
        builder.build().map_err(|err| invalid(err.to_string()))
    }

    /// Whether `relative` or one of its parent directories is excluded.
    ///
    /// `relative` must be relative to the project root.
    pub fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        self.matches(relative, is_dir)
            || relative
                .ancestors()
                .skip(1)
                .filter(|parent| !parent.as_os_str().is_empty())
                .any(|parent| self.matches(parent, true))
    }

    fn matches(&self, relative: &Path, is_dir: bool) -> bool {
        self.overrides.matched(relative, is_dir).is_ignore()
            || self.matches_extra(relative, is_dir)
    }

    fn matches_extra(&self, relative: &Path, is_dir: bool) -> bool {
        self.extra
            .as_ref()
            .map_or(false, |extra| extra.matched(relative, is_dir).is_ignore())
    }
}

/// Walks a project and yields its analyzable source files.
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    rules: IgnoreRules,
    parsers: BTreeMap<String, Dialect>,
}

impl Scanner {
    /// Prepare a scan of `root`.
    ///
    /// Fails with [`DepcheckError::NotFound`] unless `root` is an existing
    /// directory.
    pub fn new(root: &Path, options: &Options) -> Result<Self> {
        let root = root
            .canonicalize()
            .ok()
            .filter(|path| path.is_dir())
            .ok_or_else(|| DepcheckError::NotFound(root.to_path_buf()))?;
        let rules = IgnoreRules::build(&root, options)?;

        Ok(Self {
            root,
            rules,
            parsers: options.parsers.clone(),
        })
    }

    /// The canonical project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walk the project.
    ///
    /// Every call starts a fresh walk. Entries are visited in file-name
    /// order, so an unchanged tree always yields the same sequence. Hidden
    /// entries are skipped, and `.gitignore`, `.ignore` and
    /// `.depcheckignore` files are honored at every level, along with git's
    /// global and repository excludes.
    pub fn files(&self) -> impl Iterator<Item = SourceFile> + '_ {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let root = self.root.clone();
        let rules = self.rules.clone();

        WalkBuilder::new(&self.root)
            .hidden(true)
            .follow_links(true)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .overrides(self.rules.overrides.clone())
            .add_custom_ignore_filename(DEPCHECK_IGNORE_FILE)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let Ok(relative) = entry.path().strip_prefix(&root) else {
                    return false;
                };
                let is_dir = entry.file_type().map_or(false, |kind| kind.is_dir());
                if rules.matches_extra(relative, is_dir) {
                    trace!("Excluding: {}", relative.display());
                    return false;
                }
                if is_dir && is_module(entry.path()) {
                    debug!("Skipping nested package: {}", relative.display());
                    return false;
                }
                true
            })
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    if is_loop(&err) {
                        debug!("Skipping symlink cycle: {}", err);
                    } else {
                        warn!("Walk error: {}", err);
                    }
                    None
                }
            })
            .filter(|entry| entry.file_type().map_or(false, |kind| kind.is_file()))
            .filter(move |entry| match entry.path().canonicalize() {
                Ok(real) => {
                    let first_visit = seen.insert(real);
                    if !first_visit {
                        trace!("Already visited: {}", entry.path().display());
                    }
                    first_visit
                }
                Err(_) => false,
            })
            .filter_map(move |entry| self.source_file(entry.path()))
    }

    fn source_file(&self, path: &Path) -> Option<SourceFile> {
        let dialect = Dialect::detect(path, &self.parsers)?;
        let relative = path.strip_prefix(&self.root).ok()?;

        trace!("Found {:?}: {}", dialect, relative.display());
        Some(SourceFile {
            path: path.to_path_buf(),
            relative_path: to_slash(relative),
            dialect,
        })
    }
}

fn is_loop(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::Loop { .. } => true,
        ignore::Error::WithDepth { err, .. }
        | ignore::Error::WithPath { err, .. }
        | ignore::Error::WithLineNumber { err, .. } => is_loop(err),
        _ => false,
    }
}

/// Scan `root` and collect its source files in walk order.
pub fn scan(root: &Path, options: &Options) -> Result<Vec<SourceFile>> {
    let scanner = Scanner::new(root, options)?;
    let files: Vec<SourceFile> = scanner.files().collect();
    debug!("Found {} source files", files.len());
    Ok(files)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn relative_paths(root: &Path, options: &Options) -> Vec<String> {
        scan(root, options)
            .unwrap()
            .into_iter()
            .map(|file| file.relative_path)
            .collect()
    }

    #[test]
    fn test_scan_missing_root() {
        let result = Scanner::new(Path::new("/definitely/not/here"), &Options::default());
        assert!(matches!(result, Err(DepcheckError::NotFound(_))));
    }

    #[test]
    fn test_scan_root_is_file() {
        let dir = project(&[("index.js", "")]);
        let result = Scanner::new(&dir.path().join("index.js"), &Options::default());
        assert!(matches!(result, Err(DepcheckError::NotFound(_))));
    }

    #[test]
    fn test_scan_sorted_with_default_excludes() {
        let dir = project(&[
            ("package.json", "{}"),
            ("src/b.ts", ""),
            ("src/a.js", ""),
            ("src/nested/c.tsx", ""),
            ("src/logo.png", ""),
            ("README.md", ""),
            ("node_modules/react/index.js", ""),
            ("dist/bundle.js", ""),
            ("build/out.js", ""),
            (".git/hooks/pre-commit.js", ""),
        ]);

        assert_eq!(
            relative_paths(dir.path(), &Options::default()),
            vec!["src/a.js", "src/b.ts", "src/nested/c.tsx"]
        );
    }

    #[test]
    fn test_scan_user_patterns_and_ignore_files() {
        let dir = project(&[
            ("src/index.js", ""),
            ("fixtures/sample.js", ""),
            ("generated/api.ts", ""),
            ("legacy/old.js", ""),
            (".depcheckignore", "generated/\n"),
            (".gitignore", "legacy\n"),
        ]);
        let options = Options::new().with_ignore_patterns(vec!["fixtures".to_string()]);

        assert_eq!(relative_paths(dir.path(), &options), vec!["src/index.js"]);
    }

    #[test]
    fn test_scan_nested_ignore_files() {
        let dir = project(&[
            ("src/index.js", ""),
            ("src/.gitignore", "gen/\n"),
            ("src/gen/out.js", ""),
            ("lib/.depcheckignore", "*.generated.ts\n"),
            ("lib/api.generated.ts", ""),
            ("lib/api.ts", ""),
        ]);

        assert_eq!(
            relative_paths(dir.path(), &Options::default()),
            vec!["lib/api.ts", "src/index.js"]
        );
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let dir = project(&[
            ("pages/index.jsx", ""),
            (".next/server/chunk.js", ""),
            (".cache/babel/out.js", ""),
            (".eslintrc.js", ""),
        ]);

        assert_eq!(
            relative_paths(dir.path(), &Options::default()),
            vec!["pages/index.jsx"]
        );
    }

    #[test]
    fn test_ignore_rules_match_parents() {
        let dir = project(&[("my-ignore", "/scripts\n")]);
        let options = Options::new()
            .with_ignore_patterns(vec!["fixtures".to_string()])
            .with_ignore_path(Some(PathBuf::from("my-ignore")));
        let rules = IgnoreRules::build(dir.path(), &options).unwrap();

        assert!(rules.is_ignored(Path::new("node_modules/react/index.js"), false));
        assert!(rules.is_ignored(Path::new("test/fixtures/a.js"), false));
        assert!(rules.is_ignored(Path::new("scripts/tool.js"), false));
        assert!(rules.is_ignored(Path::new("logo.png"), false));
        assert!(!rules.is_ignored(Path::new("src/scripts/tool.js"), false));
        assert!(!rules.is_ignored(Path::new("src/index.js"), false));
    }

    #[test]
    fn test_scan_ignore_path() {
        let dir = project(&[("src/index.js", ""), ("scripts/tool.js", ""), ("my-ignore", "scripts\n")]);
        let options = Options::new().with_ignore_path(Some(PathBuf::from("my-ignore")));

        assert_eq!(relative_paths(dir.path(), &options), vec!["src/index.js"]);

        let missing = Options::new().with_ignore_path(Some(PathBuf::from("nope")));
        assert!(matches!(
            Scanner::new(dir.path(), &missing),
            Err(DepcheckError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_scan_skips_nested_packages() {
        let dir = project(&[
            ("package.json", "{}"),
            ("index.js", ""),
            ("packages/app/package.json", "{}"),
            ("packages/app/index.js", ""),
        ]);

        assert_eq!(relative_paths(dir.path(), &Options::default()), vec!["index.js"]);
    }

    #[test]
    fn test_scan_parser_overrides() {
        let dir = project(&[("src/a.es6", ""), ("src/b.coffee", "")]);
        let options = Options::new().with_parser("es6", Dialect::JavaScript);

        let files = scan(dir.path(), &options).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "src/a.es6");
        assert_eq!(files[0].dialect, Dialect::JavaScript);
    }

    #[test]
    fn test_files_is_restartable() {
        let dir = project(&[("a.js", ""), ("b/c.js", "")]);
        let scanner = Scanner::new(dir.path(), &Options::default()).unwrap();

        let first: Vec<_> = scanner.files().collect();
        let second: Vec<_> = scanner.files().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_survives_symlink_cycles() {
        let dir = project(&[("src/index.js", "")]);
        std::os::unix::fs::symlink(dir.path().join("src"), dir.path().join("src/loop")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("src"), dir.path().join("alias")).unwrap();

        assert_eq!(relative_paths(dir.path(), &Options::default()), vec!["alias/index.js"]);
    }
}
