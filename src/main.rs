use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use depcheck::analysis::Dialect;
use depcheck::export::{self, ExportData, ExportFormat};
use depcheck::{CancellationToken, Checker, Options};

#[derive(Parser)]
#[command(name = "depcheck")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Find unused and missing dependencies in JavaScript and TypeScript projects", long_about = None)]
struct Cli {
    /// Project directory to check
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Treat packages that ship executables as used
    #[arg(long)]
    ignore_bin_package: bool,

    /// Do not report missing dependencies
    #[arg(long)]
    skip_missing: bool,

    /// Extra gitignore-format file of paths to skip
    #[arg(long, value_name = "FILE")]
    ignore_path: Option<PathBuf>,

    /// Comma-separated gitignore patterns of paths to skip
    #[arg(long, value_delimiter = ',', value_name = "PATTERNS")]
    ignore_patterns: Vec<String>,

    /// Comma-separated globs of package names to never report
    #[arg(long, value_delimiter = ',', value_name = "GLOBS")]
    ignore_matches: Vec<String>,

    /// Comma-separated extension:dialect overrides, e.g. es6:javascript
    #[arg(long, value_delimiter = ',', value_name = "EXT:DIALECT", value_parser = parse_parser)]
    parsers: Vec<(String, Dialect)>,

    /// Options file (defaults to .depcheckrc.json or .depcheckrc in the project)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (json, markdown)
    #[arg(short, long, default_value = "json")]
    format: ExportFormat,

    /// Stop analyzing after this many seconds and report what was found
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_parser(value: &str) -> Result<(String, Dialect), String> {
    let (extension, dialect) = value
        .split_once(':')
        .ok_or_else(|| format!("expected EXT:DIALECT, got '{}'", value))?;
    let dialect = dialect.parse::<Dialect>().map_err(|e| e.to_string())?;
    Ok((extension.trim_start_matches('.').to_string(), dialect))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the project is clean.
fn run(cli: &Cli) -> Result<bool> {
    let options = load_options(cli)?;
    debug!("Options: {:?}", options);

    let mut checker = Checker::new(&cli.directory, options);
    if let Some(secs) = cli.timeout {
        checker = checker.with_cancellation(CancellationToken::with_timeout(Duration::from_secs(secs)));
    }

    let outcome = checker
        .check()
        .with_context(|| format!("Failed to check {}", cli.directory.display()))?;

    for warning in &outcome.warnings {
        warn!("{}", warning);
    }
    if outcome.incomplete {
        warn!("Check timed out; the report covers only the files analyzed so far");
    }

    let data = ExportData::new(&outcome);
    let mut stdout = io::stdout().lock();
    export::export(cli.format, &data, &mut stdout).context("Failed to write report")?;

    Ok(outcome.report.is_clean())
}

fn load_options(cli: &Cli) -> Result<Options> {
    let base = match &cli.config {
        Some(path) => Options::from_file(path)?,
        None => Options::discover(&cli.directory)?.unwrap_or_default(),
    };

    let mut flags = Options::new()
        .with_ignore_patterns(cli.ignore_patterns.clone())
        .with_ignore_matches(cli.ignore_matches.clone())
        .with_skip_missing(cli.skip_missing)
        .with_ignore_bin_package(cli.ignore_bin_package)
        .with_ignore_path(cli.ignore_path.clone());
    for (extension, dialect) in &cli.parsers {
        flags = flags.with_parser(extension.as_str(), *dialect);
    }

    Ok(base.merge(flags))
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
