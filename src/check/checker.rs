//! The end-to-end check of one project.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use super::cancel::CancellationToken;
use super::expand::UsageExpander;
use super::reconcile::{reconcile, Usages};
use super::report::{CheckOutcome, FileParseWarning};
use crate::analysis::{AnalysisError, AnalysisResult, Dialect, Import, ImportAnalyzer};
use crate::config::Options;
use crate::error::{DepcheckError, Result};
use crate::parser::{parse_file, MANIFEST_FILE};
use crate::scan::{Scanner, SourceFile};

/// Below this many files, extraction runs on the calling thread.
const PARALLEL_THRESHOLD: usize = 16;

/// Imports of one successfully analyzed file.
#[derive(Debug)]
struct FileImports {
    relative_path: String,
    dialect: Dialect,
    imports: Vec<Import>,
}

#[derive(Debug)]
enum FileOutcome {
    Analyzed(FileImports),
    Failed(FileParseWarning),
    Cancelled,
}

/// Runs a dependency check over a project directory.
///
/// # Example
///
/// ```ignore
/// use depcheck::{Checker, Options};
///
/// let outcome = Checker::new("path/to/project", Options::default()).check()?;
/// println!("{}", outcome.report.to_pretty_json()?);
/// ```
#[derive(Debug, Clone)]
pub struct Checker {
    root: PathBuf,
    options: Options,
    cancellation: CancellationToken,
}

impl Checker {
    pub fn new(root: impl Into<PathBuf>, options: Options) -> Self {
        Self {
            root: root.into(),
            options,
            cancellation: CancellationToken::new(),
        }
    }

    /// Stop analyzing files once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Scan, extract, resolve and reconcile.
    ///
    /// Fatal problems (missing project, unreadable manifest, bad patterns)
    /// are errors. Files that fail to parse become warnings on the outcome.
    pub fn check(&self) -> Result<CheckOutcome> {
        let scanner = Scanner::new(&self.root, &self.options)?;
        let root = scanner.root();

        let manifest_path = root.join(MANIFEST_FILE);
        let manifest = parse_file(&manifest_path).map_err(|source| DepcheckError::Manifest {
            path: manifest_path.clone(),
            source,
        })?;

        let ignore_matcher =
            self.options
                .ignore_matcher()
                .map_err(|err| DepcheckError::InvalidPattern {
                    pattern: err.glob().unwrap_or("<ignoreMatches>").to_string(),
                    message: err.kind().to_string(),
                })?;

        let files: Vec<SourceFile> = scanner
            .files()
            .take_while(|_| !self.cancellation.is_cancelled())
            .collect();
        let walk_interrupted = self.cancellation.is_cancelled();
        debug!("Analyzing {} source files in {}", files.len(), root.display());

        let outcomes = analyze_files(&files, &self.cancellation);

        let mut expander = UsageExpander::new(root, &manifest, self.options.ignore_bin_package);
        let mut usages = Usages::new();
        let mut warnings = Vec::new();
        let mut incomplete = walk_interrupted;
        let mut files_analyzed = 0;

        for outcome in outcomes {
            match outcome {
                FileOutcome::Analyzed(file) => {
                    files_analyzed += 1;
                    for import in &file.imports {
                        for name in expander.credit(import, file.dialect) {
                            usages
                                .entry(name)
                                .or_default()
                                .insert(file.relative_path.clone());
                        }
                    }
                }
                FileOutcome::Failed(warning) => warnings.push(warning),
                FileOutcome::Cancelled => incomplete = true,
            }
        }

        let report = reconcile(&usages, &manifest, self.options.skip_missing, |name| {
            ignore_matcher.is_match(name) || expander.is_bin_package(name)
        });

        info!(
            "Analyzed {} files: {} missing, {} unused, {} unused dev, {} warnings{}",
            files_analyzed,
            report.missing_dependencies.len(),
            report.unused_dependencies.len(),
            report.unused_dev_dependencies.len(),
            warnings.len(),
            if incomplete { " (incomplete)" } else { "" }
        );

        Ok(CheckOutcome {
            report,
            warnings,
            incomplete,
            files_analyzed,
            project_name: manifest.name.clone(),
            project_version: manifest.version.clone(),
        })
    }
}

/// Check the project at `path` with `options`.
pub fn depcheck(path: &Path, options: &Options) -> Result<CheckOutcome> {
    Checker::new(path, options.clone()).check()
}

/// Extract imports from every file, in file order.
///
/// Each rayon worker owns its own analyzer; results are collected without
/// shared state and merged by the caller.
fn analyze_files(files: &[SourceFile], token: &CancellationToken) -> Vec<FileOutcome> {
    if files.len() < PARALLEL_THRESHOLD {
        let mut analyzer = ImportAnalyzer::new();
        return files
            .iter()
            .map(|file| analyze_one(&mut analyzer, file, token))
            .collect();
    }

    files
        .par_iter()
        .map_init(ImportAnalyzer::new, |analyzer, file| {
            analyze_one(analyzer, file, token)
        })
        .collect()
}

fn analyze_one(
    analyzer: &mut AnalysisResult<ImportAnalyzer>,
    file: &SourceFile,
    token: &CancellationToken,
) -> FileOutcome {
    if token.is_cancelled() {
        return FileOutcome::Cancelled;
    }

    let result = match analyzer.as_mut() {
        Ok(analyzer) => analyzer.extract(file),
        Err(_) => Err(AnalysisError::LanguageInit),
    };

    match result {
        Ok(imports) => {
            trace!("{}: {} imports", file.relative_path, imports.len());
            FileOutcome::Analyzed(FileImports {
                relative_path: file.relative_path.clone(),
                dialect: file.dialect,
                imports,
            })
        }
        Err(err) => {
            warn!("Skipping {}: {}", file.relative_path, err);
            FileOutcome::Failed(FileParseWarning::new(&file.relative_path, err.to_string()))
        }
    }
}
