//! # Proteus: a lightweight semantic index for Java source trees
//!
//! Proteus parses every `.java` file under a root with tree-sitter, caches
//! one record per file, and answers "what fully-qualified type does this name
//! refer to?" without a compiler front end or a classpath.
//!
//! ## Design Philosophy
//!
//! - **Heuristic, not sound** - Imports, same-package siblings and JDK guesses; no type checking
//! - **Stable output** - The resolver's priority order is fixed so tool output does not drift
//! - **Best effort** - One unparseable file never stops a build
//! - **Embeddable** - Library first, CLI second
//!
//! ## Quick Start
//!
//! ```no_run
//! use proteus::{IndexConfig, ProjectIndex, QualifiedType, TypeTag};
//! use std::path::Path;
//!
//! let mut index = ProjectIndex::new(IndexConfig::new())?;
//! let stats = index.initialize(Path::new("/path/to/project/src"))?;
//! println!("Indexed {} files, {} types", stats.files_indexed, stats.types_registered);
//!
//! let widget = QualifiedType::new("com.acme.Widget", TypeTag::ProjectReference);
//! if let Some(info) = index.by_qualified_type(&widget) {
//!     for used in info.used_types() {
//!         println!("{} ({})", used, used.tag());
//!     }
//! }
//! # Ok::<(), proteus::Error>(())
//! ```
//!
//! ## Build phases
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         initialize                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Discovery (sequential): walk root, apply filters            │
//! │  Phase 1   (parallel):   parse + register, one task per file │
//! │            ── barrier ──                                     │
//! │  Phase 2   (parallel):   resolve used types, post-process    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod cache;
mod compilation;
mod config;
mod error;
mod languages;
mod parser;
mod resolver;
mod types;

pub use cache::Cache;
pub use compilation::SkipReason;
pub use config::{IndexConfig, PostProcessor, SETTINGS_FILE_NAME, Settings};
pub use error::{Error, IndexError, IndexErrorKind, ParseError, Result};
pub use languages::common::ImportDeclaration;
pub use parser::{JavaParser, SourceParser};
pub use resolver::{BOXED_PRIMITIVES, TypeLookup, resolve};
pub use types::{
    CompilationInfo, INNER_CLASS_SEPARATOR, IndexStats, QualifiedType, ResolutionData,
    TypeReference, TypeTag, UNKNOWN_TYPE_NAME,
};

use std::collections::BTreeSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use rayon::ThreadPool;
use rayon::prelude::*;
use tracing::{debug, error, info, trace, warn};

use compilation::{build_compilation_info, skip_reason};
use languages::LanguageSupport;
use languages::java::JavaLanguage;
use resolver::resolve_used_types;

/// Read-only view of the type cache handed to phase-2 tasks.
///
/// Phase 2 may look types up but cannot register or drop any.
struct IndexView<'a> {
    types: &'a Cache<QualifiedType, Arc<CompilationInfo>>,
}

impl TypeLookup for IndexView<'_> {
    fn contains_type(&self, qualified_type: &QualifiedType) -> bool {
        self.types.contains_key(qualified_type)
    }
}

/// Concurrent project index over a Java source tree.
///
/// Owns a type cache (qualified type → file record), a path cache
/// (path → file record), and package usage counts. Every cache entry for one
/// file shares the same `Arc<CompilationInfo>`.
pub struct ProjectIndex {
    config: IndexConfig,
    pool: Arc<ThreadPool>,
    types: Cache<QualifiedType, Arc<CompilationInfo>>,
    paths: Cache<PathBuf, Arc<CompilationInfo>>,
    packages: DashMap<String, usize>,
}

impl std::fmt::Debug for ProjectIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectIndex")
            .field("config", &self.config)
            .field("threads", &self.pool.current_num_threads())
            .field("files", &self.paths.len())
            .field("types", &self.types.len())
            .field("packages", &self.packages.len())
            .finish()
    }
}

impl ProjectIndex {
    /// Create an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a zero thread count, or
    /// [`Error::ThreadPool`] if the worker pool cannot be started.
    pub fn new(config: IndexConfig) -> Result<Self> {
        let pool = config.build_pool()?;
        debug!(threads = pool.current_num_threads(), "Created project index");
        Ok(Self {
            config,
            pool,
            types: Cache::new(),
            paths: Cache::new(),
            packages: DashMap::new(),
        })
    }

    /// The configuration this index was built with.
    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of worker threads used by both build phases.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    // === Building ===

    /// Build the index from every `.java` file below `root`.
    ///
    /// Clears any previous contents first. Per-file failures are logged and
    /// collected in [`IndexStats::errors`]; they never abort the build.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `root` is not an existing directory.
    pub fn initialize(&mut self, root: &Path) -> Result<IndexStats> {
        if !root.is_dir() {
            return Err(Error::InvalidArgument(format!(
                "index root is not a directory: {}",
                root.display()
            )));
        }

        let start = Instant::now();
        self.reset();

        let mut stats = IndexStats::default();
        let files = self.discover_files(root, &mut stats);
        info!(root = %root.display(), files = files.len(), "Discovered source files");

        // Phase 1: parse and register. `collect` is the barrier.
        let parsed: Vec<std::result::Result<Arc<CompilationInfo>, IndexError>> = self
            .pool
            .install(|| files.par_iter().map(|path| self.parse_task(path)).collect());

        for outcome in parsed {
            match outcome {
                Ok(_) => stats.files_indexed += 1,
                Err(e) => stats.errors.push(e),
            }
        }
        debug!(
            files_indexed = stats.files_indexed,
            failed = stats.errors.len(),
            types = self.types.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Phase 1 complete"
        );

        // Phase 2 reads the complete phase-1 index
        let mut infos = self.paths.values();
        infos.sort_by(|a, b| a.path().cmp(b.path()));
        let view = IndexView { types: &self.types };
        let post_processor = self.config.post_processor();
        let resolved: Vec<std::result::Result<usize, IndexError>> = self.pool.install(|| {
            infos
                .par_iter()
                .map(|info| resolve_task(info, &view, post_processor))
                .collect()
        });

        for outcome in resolved {
            match outcome {
                Ok(count) => stats.references_resolved += count,
                Err(e) => stats.errors.push(e),
            }
        }

        stats.types_registered = self.types.len();
        stats.duration = start.elapsed();
        info!(
            files_indexed = stats.files_indexed,
            files_skipped = stats.files_skipped,
            types = stats.types_registered,
            references = stats.references_resolved,
            errors = stats.errors.len(),
            elapsed_ms = stats.duration.as_millis(),
            "Index build complete"
        );

        Ok(stats)
    }

    /// Parse one file from disk and add it to the index.
    ///
    /// The file is resolved against the current index straight away, and the
    /// post-processor runs for it. Registering an already indexed path
    /// replaces its previous record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a path that is not an indexable
    /// `.java` file, or the error that kept the file from being parsed.
    pub fn register_file(&mut self, path: &Path) -> Result<Arc<CompilationInfo>> {
        self.register(path, None)
    }

    /// Like [`register_file`](Self::register_file), with the source text supplied
    /// instead of read from `path`.
    ///
    /// # Errors
    ///
    /// Same as [`register_file`](Self::register_file), minus I/O errors.
    pub fn register_source(&mut self, path: &Path, source: &str) -> Result<Arc<CompilationInfo>> {
        self.register(path, Some(source))
    }

    fn register(&mut self, path: &Path, source: Option<&str>) -> Result<Arc<CompilationInfo>> {
        if !JavaLanguage.is_source_file(path) {
            return Err(Error::InvalidArgument(format!(
                "not a Java source file: {}",
                path.display()
            )));
        }
        if let Some(reason) = skip_reason(path, self.config.exclusions()) {
            return Err(Error::InvalidArgument(format!(
                "{} is filtered out ({reason:?})",
                path.display()
            )));
        }

        let info = Arc::new(build_compilation_info(self.config.parser(), path, source)?);
        if let Some(previous) = self.paths.get(&info.path().to_path_buf()) {
            self.unregister(&previous);
        }
        self.insert(&info);

        let view = IndexView { types: &self.types };
        if resolve_task(&info, &view, self.config.post_processor()).is_err() {
            warn!(file = %path.display(), "Registered file without resolved types");
        }
        Ok(info)
    }

    /// One phase-1 task: build a file's record and register it.
    fn parse_task(&self, path: &Path) -> std::result::Result<Arc<CompilationInfo>, IndexError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            build_compilation_info(self.config.parser(), path, None).map(|info| {
                let info = Arc::new(info);
                self.insert(&info);
                info
            })
        }));

        match outcome {
            Ok(Ok(info)) => Ok(info),
            Ok(Err(e)) => {
                warn!(file = %path.display(), error = %e, "Failed to index file, skipping");
                Err(IndexError::from_error(path.to_path_buf(), &e))
            }
            Err(payload) => {
                let e = IndexError::task_panicked(path.to_path_buf(), payload.as_ref());
                error!(file = %path.display(), error = %e.message, "Indexing task panicked");
                Err(e)
            }
        }
    }

    /// Register a record under its path and every type it declares.
    ///
    /// A type declared by two files goes to the smaller path, whatever order
    /// the two tasks finish in.
    fn insert(&self, info: &Arc<CompilationInfo>) {
        self.paths.put(info.path().to_path_buf(), Arc::clone(info));
        for declared in info.declared_types() {
            self.types
                .put_unless(declared.clone(), Arc::clone(info), |current, new| {
                    if current.path() == new.path() {
                        return false;
                    }
                    let (kept, dropped) = if current.path() < new.path() {
                        (current, new)
                    } else {
                        (new, current)
                    };
                    warn!(
                        qualified_type = %declared,
                        kept = %kept.path().display(),
                        dropped = %dropped.path().display(),
                        "Type declared in more than one file"
                    );
                    Arc::ptr_eq(kept, current)
                });
        }
        self.increment_package(info.resolution_data().package_name());
    }

    /// Drop a record's entries, leaving entries that other files have since claimed.
    fn unregister(&mut self, info: &Arc<CompilationInfo>) {
        self.paths.remove(&info.path().to_path_buf());
        for declared in info.declared_types() {
            if self
                .types
                .get(declared)
                .is_some_and(|current| Arc::ptr_eq(&current, info))
            {
                self.types.remove(declared);
            }
        }
        self.remove_package_name(info.resolution_data().package_name());
    }

    fn increment_package(&self, name: &str) {
        *self.packages.entry(name.to_string()).or_insert(0) += 1;
    }

    fn reset(&mut self) {
        self.types.reset();
        self.paths.reset();
        self.packages.clear();
    }

    /// Collect candidate files below `root`, sorted so builds are reproducible.
    fn discover_files(&self, root: &Path, stats: &mut IndexStats) -> Vec<PathBuf> {
        let mut files = Vec::new();
        self.walk_dir(root, &mut files, stats);
        files.sort();
        files
    }

    /// Recursively walk a directory, collecting `.java` files that pass the filters.
    ///
    /// Directories that cannot be read are tracked in `stats.directories_skipped`.
    fn walk_dir(&self, dir: &Path, files: &mut Vec<PathBuf>, stats: &mut IndexStats) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    directory = %dir.display(),
                    error = %e,
                    "Cannot read directory, skipping"
                );
                stats.directories_skipped.push((dir.to_path_buf(), e.to_string()));
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(
                        directory = %dir.display(),
                        error = %e,
                        "Failed to read directory entry, skipping"
                    );
                    continue;
                }
            };

            let path = entry.path();

            if path.is_dir() {
                // Hidden directories (`.git`, `.idea`) never hold sources
                let hidden = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| name.starts_with('.'));
                if !hidden {
                    self.walk_dir(&path, files, stats);
                }
            } else if path.is_file() && JavaLanguage.is_source_file(&path) {
                match skip_reason(&path, self.config.exclusions()) {
                    Some(reason) => {
                        trace!(file = %path.display(), ?reason, "Skipping filtered file");
                        stats.files_skipped += 1;
                    }
                    None => files.push(path),
                }
            }
        }
    }

    // === Queries ===

    /// The record registered for exactly this path.
    #[must_use]
    pub fn by_path(&self, path: &Path) -> Option<Arc<CompilationInfo>> {
        self.paths.get(&path.to_path_buf())
    }

    /// The record of the file that declares `qualified_type`.
    ///
    /// Binary inner names (`a.Outer$Inner`) are normalized to their outer
    /// class first, so they find the enclosing file.
    #[must_use]
    pub fn by_qualified_type(&self, qualified_type: &QualifiedType) -> Option<Arc<CompilationInfo>> {
        self.types.get(&qualified_type.as_outer_class())
    }

    /// Every registered qualified type, outer and inner.
    #[must_use]
    pub fn all_qualified_types(&self) -> BTreeSet<QualifiedType> {
        self.types.keys().into_iter().collect()
    }

    /// Every file record, ordered by path.
    #[must_use]
    pub fn all_compilation_info(&self) -> Vec<Arc<CompilationInfo>> {
        let mut infos = self.paths.values();
        infos.sort_by(|a, b| a.path().cmp(b.path()));
        infos
    }

    /// Package names with a usage count above zero. The default package is `""`.
    #[must_use]
    pub fn stored_package_names(&self) -> BTreeSet<String> {
        self.packages
            .iter()
            .filter(|entry| *entry.value() > 0)
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Current usage count of a package, zero when unknown.
    #[must_use]
    pub fn package_usage(&self, name: &str) -> usize {
        self.packages.get(name).map_or(0, |count| *count)
    }

    /// Number of indexed files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.paths.len()
    }

    /// Resolve a single reference in the context of an indexed file.
    ///
    /// Returns `None` when `path` is not indexed.
    #[must_use]
    pub fn resolve_in(&self, path: &Path, reference: &TypeReference) -> Option<QualifiedType> {
        let info = self.by_path(path)?;
        Some(resolve(reference, info.resolution_data(), Some(self)))
    }

    // === Package bookkeeping ===

    /// Count one more use of `name`.
    pub fn add_package_name(&mut self, name: &str) {
        self.increment_package(name);
    }

    /// Count one less use of `name`, forgetting it at zero.
    ///
    /// Unknown names are ignored.
    pub fn remove_package_name(&mut self, name: &str) {
        let now_unused = match self.packages.get_mut(name) {
            Some(mut count) => {
                *count = count.saturating_sub(1);
                *count == 0
            }
            None => return,
        };
        if now_unused {
            self.packages.remove(name);
        }
    }
}

impl TypeLookup for ProjectIndex {
    fn contains_type(&self, qualified_type: &QualifiedType) -> bool {
        self.types.contains_key(qualified_type)
    }
}

/// One phase-2 task: fill `used_types`, then run the post-processor.
///
/// Returns the number of references resolved.
fn resolve_task(
    info: &Arc<CompilationInfo>,
    view: &IndexView<'_>,
    post_processor: Option<&PostProcessor>,
) -> std::result::Result<usize, IndexError> {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let used = resolve_used_types(info, Some(view));
        if !info.set_used_types(used) {
            debug!(file = %info.path().display(), "Used types already resolved");
        }
        if let Some(callback) = post_processor {
            callback(info.as_ref());
        }
        info.type_references().len()
    }));

    outcome.map_err(|payload| {
        let e = IndexError::task_panicked(info.path().to_path_buf(), payload.as_ref());
        error!(file = %info.path().display(), error = %e.message, "Resolve task panicked");
        e
    })
}
