//! Command-line behavior: output formats, option flags and exit codes.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn depcheck() -> Command {
    Command::cargo_bin("depcheck").unwrap()
}

fn fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

#[test]
fn test_unused_dependency_exits_one() {
    let output = depcheck().arg(fixture("bad")).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["unusedDependencies"], serde_json::json!(["optimist"]));
    assert_eq!(report["missingDependencies"], serde_json::json!({}));
}

#[test]
fn test_clean_project_exits_zero() {
    depcheck()
        .arg(fixture("scoped"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"@scope/pkg\""));
}

#[test]
fn test_ignore_matches_flag() {
    depcheck()
        .arg(fixture("bad"))
        .args(["--ignore-matches", "opti*,other"])
        .assert()
        .success();
}

#[test]
fn test_markdown_format() {
    depcheck()
        .arg(fixture("bad"))
        .args(["--format", "markdown"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("### Unused Dependencies (1)"))
        .stdout(predicate::str::contains("- `optimist`"));
}

#[test]
fn test_missing_directory_exits_two() {
    depcheck()
        .arg("/no/such/project")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Project directory not found"));
}

#[test]
fn test_invalid_parser_flag() {
    depcheck()
        .arg(fixture("bad"))
        .args(["--parsers", "es6:cobol"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown dialect"));
}

#[test]
fn test_config_file_and_flags_merge() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"dependencies": {"left-pad": "*"}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("index.es6"), "import express from 'express';").unwrap();
    fs::write(
        dir.path().join(".depcheckrc.json"),
        r#"{"ignoreMatches": ["left-pad"]}"#,
    )
    .unwrap();

    // Without the parser override nothing is analyzed and the rc file
    // silences the only unused dependency.
    depcheck().arg(dir.path()).assert().success();

    depcheck()
        .arg(dir.path())
        .args(["--parsers", "es6:javascript"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"express\""));

    depcheck()
        .arg(dir.path())
        .args(["--parsers", "es6:javascript", "--skip-missing"])
        .assert()
        .success();
}

#[test]
fn test_warnings_go_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("package.json"), "{}").unwrap();
    fs::write(dir.path().join("broken.js"), "import { from 'x';").unwrap();

    let output = depcheck().arg(dir.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(!stdout.contains("broken.js"));
    assert!(stderr.contains("broken.js"));
}
