//! Specifier resolution.
//!
//! Normalizes raw import specifiers into manifest-comparable package names,
//! so that `lodash/fp` and `lodash` both count towards the `lodash`
//! declaration.

/// Node.js core modules, importable without a declared dependency.
const CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Outcome of resolving one import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An npm package, by its top-level name.
    Package(String),
    /// A relative, absolute or package-internal (`#`) reference.
    Local,
    /// A built-in module, URL or malformed specifier.
    Ignored,
}

impl Resolution {
    pub fn package_name(&self) -> Option<&str> {
        match self {
            Resolution::Package(name) => Some(name),
            _ => None,
        }
    }
}

/// Resolve a raw specifier.
///
/// # Example
///
/// ```
/// use depcheck::analysis::resolver::{resolve, Resolution};
///
/// assert_eq!(resolve("@scope/name/sub/path"), Resolution::Package("@scope/name".into()));
/// assert_eq!(resolve("pkg/lib/util"), Resolution::Package("pkg".into()));
/// assert_eq!(resolve("../x"), Resolution::Local);
/// assert_eq!(resolve("fs"), Resolution::Ignored);
/// ```
pub fn resolve(specifier: &str) -> Resolution {
    if is_local(specifier) {
        return Resolution::Local;
    }
    if is_core_module(specifier) || has_scheme(specifier) {
        return Resolution::Ignored;
    }

    match extract_package_name(specifier) {
        Some(name) => Resolution::Package(name),
        None => Resolution::Ignored,
    }
}

/// Returns true for specifiers that never name an npm package.
fn is_local(specifier: &str) -> bool {
    specifier.starts_with('.') || specifier.starts_with('/') || specifier.starts_with('#')
}

/// `node:fs`, `https://cdn/x.js`, `virtual:entry` and friends.
fn has_scheme(specifier: &str) -> bool {
    let first_segment = specifier.split('/').next().unwrap_or_default();
    first_segment.contains(':')
}

/// Returns true if the specifier addresses a Node.js core module,
/// including `node:` prefixed and sub-path forms such as `fs/promises`.
pub fn is_core_module(specifier: &str) -> bool {
    if let Some(rest) = specifier.strip_prefix("node:") {
        return !rest.is_empty();
    }
    let root = specifier.split('/').next().unwrap_or_default();
    CORE_MODULES.contains(&root)
}

/// Extract the top-level package name of a bare specifier.
///
/// Empty path segments are skipped, so `tape///foo` yields `tape` and
/// `@user//foobar` yields `@user/foobar`. A scope without a name yields
/// `None`.
pub fn extract_package_name(specifier: &str) -> Option<String> {
    let mut segments = specifier.split('/').filter(|segment| !segment.is_empty());
    let first = segments.next()?;

    if first.starts_with('@') {
        if first.len() == 1 {
            return None;
        }
        let name = segments.next()?;
        Some(format!("{}/{}", first, name))
    } else {
        Some(first.to_string())
    }
}

/// Name of the DefinitelyTyped package providing types for `name`.
///
/// Scoped packages map to `@types/scope__name`; Node.js core modules map
/// to `@types/node`.
pub fn types_package_name(name: &str) -> String {
    if is_core_module(name) {
        return "@types/node".to_string();
    }

    match name
        .strip_prefix('@')
        .and_then(|scoped| scoped.split_once('/'))
    {
        Some((scope, package)) => format!("@types/{}__{}", scope, package),
        None => format!("@types/{}", name),
    }
}
