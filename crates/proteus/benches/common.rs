//! Shared utilities for Proteus benchmarks.

// Benchmark utilities - pedantic lints not critical here
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use proteus::{IndexConfig, ProjectIndex};
use tempfile::TempDir;

/// A workspace ready for benchmarking with the index already built.
pub struct IndexedWorkspace {
    /// Temp directory - must be kept alive for the duration of the benchmark.
    pub dir: TempDir,
    /// Index built over the workspace.
    pub index: ProjectIndex,
}

/// Generate a realistic Java class with fields, generics and nested types.
///
/// Each class star-imports `previous_package` so phase 2 exercises the
/// index-backed star-import lookup.
pub fn generate_java_file(package: &str, previous_package: &str, class: &str, siblings: usize) -> String {
    let mut code = format!(
        "package {package};\n\n\
         import java.util.List;\n\
         import java.util.Map;\n\
         import {previous_package}.*;\n\n\
         public class {class} {{\n"
    );

    for i in 0..siblings {
        code.push_str(&format!("    private Type{i} field{i};\n"));
    }
    code.push_str(
        "    private final Map<String, List<Integer>> counts;\n\
         private long total;\n\n",
    );
    code.push_str(&format!(
        "    public {class}(Map<String, List<Integer>> counts) {{\n\
                 this.counts = counts;\n\
             }}\n\n\
             public <T extends Comparable<T>> T max(List<? extends T> values) {{\n\
                 return values.get(0);\n\
             }}\n\n\
             public static final class Builder {{\n\
                 private StringBuilder name = new StringBuilder();\n\
                 public {class} build() {{ return null; }}\n\
             }}\n\
         }}\n"
    ));
    code
}

/// Generate a project of `packages` packages with `per_package` classes each.
pub fn generate_project(packages: usize, per_package: usize) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for p in 0..packages {
        let previous = if p == 0 { packages - 1 } else { p - 1 };
        for c in 0..per_package {
            files.push((
                format!("src/main/java/pkg{p}/Type{c}.java"),
                generate_java_file(&format!("pkg{p}"), &format!("pkg{previous}"), &format!("Type{c}"), per_package),
            ));
        }
    }
    files
}

/// Create a temporary workspace with the given files.
/// Returns the temp directory (must be kept alive) and the workspace path.
pub fn create_workspace(files: &[(String, String)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("failed to write file");
    }

    let path = dir.path().to_path_buf();
    (dir, path)
}

/// Create a workspace and build the index over it.
pub fn create_indexed_workspace(files: &[(String, String)], threads: usize) -> IndexedWorkspace {
    let (dir, path) = create_workspace(files);
    let mut index = ProjectIndex::new(IndexConfig::new().with_threads(threads))
        .expect("failed to create index");
    index.initialize(&path).expect("index failed");
    IndexedWorkspace { dir, index }
}
