//! Index construction options and the on-disk settings file.
//!
//! [`IndexConfig`] is what [`crate::ProjectIndex::new`] consumes. [`Settings`]
//! is the YAML file a workspace may carry at its root; the CLI merges it with
//! its own flags and converts the result into an `IndexConfig`.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rayon::ThreadPool;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::parser::{JavaParser, SourceParser};
use crate::types::CompilationInfo;

/// Name of the optional settings file at the workspace root.
pub const SETTINGS_FILE_NAME: &str = ".proteus.yaml";

/// Callback run once per file after its used types are resolved.
pub type PostProcessor = Arc<dyn Fn(&CompilationInfo) + Send + Sync>;

/// Construction-time configuration for a [`crate::ProjectIndex`].
#[derive(Clone)]
pub struct IndexConfig {
    exclusions: Vec<Regex>,
    threads: Option<usize>,
    pool: Option<Arc<ThreadPool>>,
    parser: Arc<dyn SourceParser>,
    post_processor: Option<PostProcessor>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            exclusions: Vec::new(),
            threads: None,
            pool: None,
            parser: Arc::new(JavaParser),
            post_processor: None,
        }
    }
}

impl fmt::Debug for IndexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexConfig")
            .field(
                "exclusions",
                &self.exclusions.iter().map(Regex::as_str).collect::<Vec<_>>(),
            )
            .field("threads", &self.threads)
            .field("custom_pool", &self.pool.is_some())
            .field("post_processor", &self.post_processor.is_some())
            .finish_non_exhaustive()
    }
}

impl IndexConfig {
    /// Default configuration: no exclusions, one worker per core, tree-sitter-java.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add path exclusion patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if any pattern is not a valid regex.
    pub fn with_exclusions<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.exclusions.push(Regex::new(pattern.as_ref())?);
        }
        Ok(self)
    }

    /// Size of the worker pool the index creates. Ignored when a pool is supplied.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Run both build phases on an existing pool.
    #[must_use]
    pub fn with_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Replace the default tree-sitter-java parser.
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn SourceParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Run `callback` once per file after phase 2 has finalized it.
    #[must_use]
    pub fn with_post_processor<F>(mut self, callback: F) -> Self
    where
        F: Fn(&CompilationInfo) + Send + Sync + 'static,
    {
        self.post_processor = Some(Arc::new(callback));
        self
    }

    /// Compiled exclusion patterns.
    #[must_use]
    pub fn exclusions(&self) -> &[Regex] {
        &self.exclusions
    }

    /// Requested worker count, if any.
    #[must_use]
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// The parser every phase-1 task uses.
    #[must_use]
    pub fn parser(&self) -> &dyn SourceParser {
        self.parser.as_ref()
    }

    /// The configured post-processor, if any.
    #[must_use]
    pub fn post_processor(&self) -> Option<&PostProcessor> {
        self.post_processor.as_ref()
    }

    /// The supplied pool, or a new one sized by `threads` (all cores when unset).
    pub(crate) fn build_pool(&self) -> Result<Arc<ThreadPool>> {
        if let Some(pool) = &self.pool {
            return Ok(Arc::clone(pool));
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidArgument(
                "worker thread count must be at least 1".to_string(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads.unwrap_or(0))
            .thread_name(|idx| format!("proteus-worker-{idx}"))
            .build()?;
        Ok(Arc::new(pool))
    }
}

/// Contents of a workspace's `.proteus.yaml`.
///
/// ```yaml
/// exclude:
///   - "generated/"
///   - "Test\\.java$"
/// threads: 4
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Path exclusion regexes
    pub exclude: Vec<String>,
    /// Worker thread count
    pub threads: Option<usize>,
}

impl Settings {
    /// Parse settings from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] for malformed YAML or unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty file deserializes as null, not as an empty mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load `<root>/.proteus.yaml`, or defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file exists but cannot be read, or
    /// [`Error::Settings`] if it cannot be parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(SETTINGS_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)?;
        Self::from_yaml(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Overlay command-line values: extra exclusions are appended and an
    /// explicit thread count wins.
    #[must_use]
    pub fn merge(mut self, exclude: Vec<String>, threads: Option<usize>) -> Self {
        self.exclude.extend(exclude);
        if threads.is_some() {
            self.threads = threads;
        }
        self
    }

    /// Convert into an [`IndexConfig`] with the default parser.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if an exclusion is not a valid regex.
    pub fn into_config(self) -> Result<IndexConfig> {
        let config = IndexConfig::new().with_exclusions(&self.exclude)?;
        Ok(match self.threads {
            Some(threads) => config.with_threads(threads),
            None => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn exclusions_are_compiled() {
        let config = IndexConfig::new()
            .with_exclusions(["generated/", r"Test\.java$"])
            .expect("valid patterns");

        let patterns: Vec<_> = config.exclusions().iter().map(Regex::as_str).collect();
        assert_eq!(patterns, vec!["generated/", r"Test\.java$"]);
    }

    #[test]
    fn invalid_exclusion_is_rejected() {
        let result = IndexConfig::new().with_exclusions(["(unclosed"]);

        assert!(matches!(result, Err(Error::Pattern(_))));
    }

    #[test]
    fn zero_threads_is_invalid() {
        let result = IndexConfig::new().with_threads(0).build_pool();

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn supplied_pool_is_reused() {
        let pool = Arc::new(
            rayon::ThreadPoolBuilder::new()
                .num_threads(2)
                .build()
                .expect("pool should build"),
        );
        let config = IndexConfig::new().with_pool(Arc::clone(&pool)).with_threads(0);

        let built = config.build_pool().expect("supplied pool wins over thread count");
        assert!(Arc::ptr_eq(&pool, &built));
    }

    #[test]
    fn pool_uses_requested_thread_count() {
        let pool = IndexConfig::new().with_threads(3).build_pool().expect("pool should build");

        assert_eq!(pool.current_num_threads(), 3);
    }

    #[test]
    fn settings_parse_from_yaml() {
        let settings = Settings::from_yaml("exclude:\n  - generated/\nthreads: 4\n").expect("valid yaml");

        assert_eq!(settings.exclude, vec!["generated/".to_string()]);
        assert_eq!(settings.threads, Some(4));
    }

    #[test]
    fn empty_settings_are_defaults() {
        assert_eq!(Settings::from_yaml("").expect("empty is valid"), Settings::default());
        assert_eq!(Settings::from_yaml("exclude: []\n").expect("valid yaml"), Settings::default());
    }

    #[test]
    fn unknown_settings_keys_are_rejected() {
        let result = Settings::from_yaml("exclusions: [a]\n");

        assert!(matches!(result, Err(Error::Settings(_))));
    }

    #[test]
    fn missing_settings_file_yields_defaults() {
        let dir = TempDir::new().expect("failed to create temp dir");

        assert_eq!(Settings::load(dir.path()).expect("load should succeed"), Settings::default());
    }

    #[test]
    fn settings_file_is_loaded_from_root() {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::write(dir.path().join(SETTINGS_FILE_NAME), "threads: 2\n").expect("write settings");

        let settings = Settings::load(dir.path()).expect("load should succeed");

        assert_eq!(settings.threads, Some(2));
    }

    #[test]
    fn malformed_settings_file_names_the_file() {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::write(dir.path().join(SETTINGS_FILE_NAME), "threads: many\n").expect("write settings");

        let error = Settings::load(dir.path()).expect_err("bad value should fail");

        assert!(matches!(error, Error::Config(ref msg) if msg.contains(SETTINGS_FILE_NAME)));
    }

    #[test]
    fn command_line_values_overlay_settings() {
        let settings = Settings {
            exclude: vec!["a/".to_string()],
            threads: Some(2),
        }
        .merge(vec!["b/".to_string()], Some(8));

        assert_eq!(settings.exclude, vec!["a/".to_string(), "b/".to_string()]);
        assert_eq!(settings.threads, Some(8));

        let config = settings.into_config().expect("valid settings");
        assert_eq!(config.threads(), Some(8));
        assert_eq!(config.exclusions().len(), 2);
    }

    #[test]
    fn merge_keeps_file_thread_count_without_flag() {
        let settings = Settings {
            exclude: Vec::new(),
            threads: Some(2),
        }
        .merge(Vec::new(), None);

        assert_eq!(settings.threads, Some(2));
    }
}
