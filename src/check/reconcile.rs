//! Cross-referencing usages with declarations.

use std::collections::{BTreeMap, BTreeSet};

use super::report::Report;
use crate::parser::{DependencyType, PackageJson};

/// Credited package name → relative paths of the files using it.
pub type Usages = BTreeMap<String, BTreeSet<String>>;

/// Build the report for `usages` against `manifest`.
///
/// Names for which `is_ignored` returns true are never reported missing or
/// unused, though they still show up under `using_dependencies` when
/// declared and used. With `skip_missing` the missing category stays empty.
pub fn reconcile<F>(
    usages: &Usages,
    manifest: &PackageJson,
    skip_missing: bool,
    is_ignored: F,
) -> Report
where
    F: Fn(&str) -> bool,
{
    let mut report = Report::default();

    for (name, files) in usages {
        if files.is_empty() {
            continue;
        }
        let files: Vec<String> = files.iter().cloned().collect();

        if manifest.is_any_dependency(name) {
            report.using_dependencies.insert(name.clone(), files);
        } else if !skip_missing && !is_ignored(name) {
            report.missing_dependencies.insert(name.clone(), files);
        }
    }

    let unused = |dep_type: DependencyType| -> Vec<String> {
        manifest
            .get_dependencies(dep_type)
            .keys()
            .filter(|name| !report.using_dependencies.contains_key(name.as_str()))
            .filter(|name| !is_ignored(name.as_str()))
            .cloned()
            .collect()
    };
    let unused_dependencies = unused(DependencyType::Production);
    let unused_dev_dependencies = unused(DependencyType::Development);

    report.unused_dependencies = unused_dependencies;
    report.unused_dev_dependencies = unused_dev_dependencies;
    report
}
