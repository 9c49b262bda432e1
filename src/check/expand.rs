//! Turning resolved imports into credited dependency names.
//!
//! A single import may satisfy more than one declaration: TypeScript code
//! also uses the package's `@types` companion, and an installed package
//! pulls in the peer and optional dependencies it expects the project to
//! provide.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::analysis::{is_core_module, resolve, types_package_name, Dialect, Import, Resolution};
use crate::parser::{load_installed, DependencyType, PackageJson};

/// Credits dependency names for imports of one project.
///
/// Installed manifests under `node_modules` are read at most once.
#[derive(Debug)]
pub struct UsageExpander<'a> {
    root: PathBuf,
    manifest: &'a PackageJson,
    installed: HashMap<String, Option<PackageJson>>,
    bin_packages: HashSet<String>,
}

impl<'a> UsageExpander<'a> {
    /// With `ignore_bin_package`, declared packages whose installed manifest
    /// has a `bin` entry are recorded and never credited.
    pub fn new(root: &Path, manifest: &'a PackageJson, ignore_bin_package: bool) -> Self {
        let mut expander = Self {
            root: root.to_path_buf(),
            manifest,
            installed: HashMap::new(),
            bin_packages: HashSet::new(),
        };

        if ignore_bin_package {
            let declared: Vec<String> = DependencyType::ALL
                .iter()
                .flat_map(|dep_type| manifest.get_dependencies(*dep_type).keys())
                .cloned()
                .collect();
            for name in declared {
                if expander.installed(&name).is_some_and(PackageJson::has_bin) {
                    debug!("Ignoring bin package: {}", name);
                    expander.bin_packages.insert(name);
                }
            }
        }

        expander
    }

    /// True for declared packages that ship executables, when
    /// `ignore_bin_package` was requested.
    pub fn is_bin_package(&self, name: &str) -> bool {
        self.bin_packages.contains(name)
    }

    /// Names credited by one import found in a file of `dialect`.
    pub fn credit(&mut self, import: &Import, dialect: Dialect) -> Vec<String> {
        let name = match resolve(&import.source) {
            Resolution::Package(name) => name,
            Resolution::Local => return Vec::new(),
            Resolution::Ignored => {
                let node_types = "@types/node";
                if dialect.is_typescript()
                    && is_core_module(&import.source)
                    && self.declares_runtime_or_dev(node_types)
                {
                    return vec![node_types.to_string()];
                }
                return Vec::new();
            }
        };

        let types_name = types_package_name(&name);
        let types_declared = self.declares_runtime_or_dev(&types_name);

        let mut names = Vec::new();
        if import.is_type_only() {
            if types_declared {
                names.push(types_name);
            } else {
                names.push(name.clone());
            }
        } else {
            names.push(name.clone());
            if dialect.is_typescript() && types_declared {
                names.push(types_name);
            }
        }

        names.extend(self.expected_from_installed(&name));
        names.retain(|name| !self.is_bin_package(name));
        names
    }

    /// Peer and optional dependencies of the installed `name` that the
    /// project itself declares.
    fn expected_from_installed(&mut self, name: &str) -> Vec<String> {
        let manifest = self.manifest;
        let Some(installed) = self.installed(name) else {
            return Vec::new();
        };

        [DependencyType::Peer, DependencyType::Optional]
            .iter()
            .flat_map(|dep_type| installed.get_dependencies(*dep_type).keys())
            .filter(|dep| manifest.is_dependency(dep) || manifest.is_dev_dependency(dep))
            .cloned()
            .collect()
    }

    fn declares_runtime_or_dev(&self, name: &str) -> bool {
        self.manifest.is_dependency(name) || self.manifest.is_dev_dependency(name)
    }

    fn installed(&mut self, name: &str) -> Option<&PackageJson> {
        let root = &self.root;
        self.installed
            .entry(name.to_string())
            .or_insert_with(|| load_installed(root, name))
            .as_ref()
    }
}
