//! Benchmarks for import extraction and full project checks
//!
//! Measures how extraction scales with file size and how a whole check
//! scales with the number of files in a project.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use depcheck::analysis::{resolve, Dialect, ImportAnalyzer};
use depcheck::{depcheck, Options};
use std::fs;
use std::path::Path;

/// Create a module with the given number of import statements
fn create_source(imports: usize) -> String {
    let mut source = String::new();
    for i in 0..imports {
        match i % 4 {
            0 => source.push_str(&format!("import dep{} from 'package-{}';\n", i, i)),
            1 => source.push_str(&format!("const dep{} = require('@scope/package-{}/lib');\n", i, i)),
            2 => source.push_str(&format!("export {{ value{} }} from './local-{}';\n", i, i)),
            _ => source.push_str(&format!("const lazy{} = () => import('package-{}');\n", i, i)),
        }
    }
    source.push_str("\nexport function main() {\n  return dep0;\n}\n");
    source
}

/// Write a project with `files` source files into `root`
fn create_project(root: &Path, files: usize) {
    let dependencies: Vec<String> = (0..20)
        .map(|i| format!("\"package-{}\": \"^1.0.0\"", i))
        .collect();
    fs::write(
        root.join("package.json"),
        format!("{{\"dependencies\": {{{}}}}}", dependencies.join(", ")),
    )
    .unwrap();

    let src = root.join("src");
    fs::create_dir_all(&src).unwrap();
    for i in 0..files {
        fs::write(src.join(format!("module{}.js", i)), create_source(20)).unwrap();
    }
}

/// Benchmark extraction from a single source file
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_imports");
    let mut analyzer = ImportAnalyzer::new().unwrap();

    for size in [10, 100, 1000].iter() {
        let source = create_source(*size);

        group.bench_with_input(BenchmarkId::new("imports", size), &source, |b, src| {
            b.iter(|| {
                black_box(
                    analyzer
                        .analyze_source(src, Dialect::JavaScript, Path::new("bench.js"))
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

/// Benchmark specifier resolution
fn bench_resolve(c: &mut Criterion) {
    let specifiers = [
        "react",
        "lodash/fp/map",
        "@babel/core/lib/config",
        "./relative/module",
        "node:fs/promises",
        "tape///foo",
    ];

    c.bench_function("resolve_specifiers", |b| {
        b.iter(|| {
            for specifier in specifiers.iter() {
                black_box(resolve(specifier));
            }
        });
    });
}

/// Benchmark a complete check, crossing the parallel threshold
fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_project");
    group.sample_size(20);

    for files in [10, 100, 500].iter() {
        let dir = tempfile::tempdir().unwrap();
        create_project(dir.path(), *files);

        group.bench_with_input(BenchmarkId::new("files", files), dir.path(), |b, root| {
            b.iter(|| black_box(depcheck(root, &Options::default()).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_resolve, bench_check);
criterion_main!(benches);
