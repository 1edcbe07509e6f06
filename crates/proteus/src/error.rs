//! Error types for Proteus operations.
//!
//! Errors are categorized into two main types:
//!
//! - **`Error`**: Top-level errors that halt an operation (bad arguments, invalid
//!   configuration, I/O failures on the root itself)
//! - **`IndexError`**: File-level errors that are collected but don't halt indexing
//!
//! ## Error Philosophy
//!
//! Proteus follows a "best effort" approach for indexing:
//! - A single malformed file shouldn't prevent indexing the rest
//! - An unresolvable type name is never an error, it degrades to `UNKNOWN`
//! - Only programmer errors (arguments, configuration) cause early termination
//!
//! ## Error Categorization
//!
//! `IndexErrorKind` uses a 4xx/5xx style categorization:
//! - Input problems (user's fault): parse errors, empty compilation units
//! - Internal problems (our fault): I/O errors, panicking tasks

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Proteus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Proteus operations.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A public entry point was called with an unusable argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// An exclusion pattern failed to compile
    #[error("invalid exclusion pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The worker pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The settings file could not be decoded
    #[error("invalid settings file: {0}")]
    Settings(#[from] serde_yaml::Error),

    /// The parser rejected a compilation unit
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The compilation unit declares no types, so it has no primary type
    #[error("compilation unit declares no types: {}", .0.display())]
    NoDeclaredTypes(PathBuf),

    /// File content is not valid UTF-8
    #[error("file is not valid UTF-8: {}", .0.display())]
    Encoding(PathBuf),

    /// Query output could not be encoded as JSON
    #[error("failed to encode JSON output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure reported by a [`SourceParser`](crate::SourceParser).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser
    #[error("failed to load grammar: {0}")]
    Language(String),

    /// The parser returned no tree at all
    #[error("parser produced no syntax tree")]
    NoTree,

    /// The tree contains an `ERROR` or `MISSING` node
    #[error("syntax error at {line}:{column} ({kind})")]
    Syntax {
        /// Line of the first error node (1-indexed)
        line: u32,
        /// Column of the first error node (1-indexed)
        column: u32,
        /// Node kind reported by tree-sitter
        kind: String,
    },
}

/// Error encountered while indexing a specific file.
///
/// These errors are collected during indexing but don't halt the operation.
/// The indexer continues with remaining files and reports all errors at the end.
#[derive(Debug, Clone)]
pub struct IndexError {
    /// Path to the file that failed
    pub path: PathBuf,
    /// Category of the error
    pub kind: IndexErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for IndexError {}

/// Categorization of indexing errors.
///
/// Uses a 4xx/5xx style pattern:
/// - Input problems are issues with the source files (user can fix)
/// - Internal problems are issues with Proteus itself (we need to fix)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorKind {
    // === Input Problems (analogous to HTTP 4xx) ===
    /// Source file has syntax errors that prevent parsing
    ParseFailed,

    /// Source file parses but declares no types
    NoDeclaredTypes,

    /// File content is not valid UTF-8
    EncodingError,

    // === Internal Problems (analogous to HTTP 5xx) ===
    /// Could not read the file from disk
    IoError,

    /// A parse or resolve task panicked
    TaskPanicked,
}

impl std::fmt::Display for IndexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailed => write!(f, "parse failed"),
            Self::NoDeclaredTypes => write!(f, "no declared types"),
            Self::EncodingError => write!(f, "encoding error"),
            Self::IoError => write!(f, "I/O error"),
            Self::TaskPanicked => write!(f, "task panicked"),
        }
    }
}

impl IndexErrorKind {
    /// Returns `true` if this is an input problem (4xx-style).
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ParseFailed | Self::NoDeclaredTypes | Self::EncodingError
        )
    }

    /// Returns `true` if this is an internal problem (5xx-style).
    #[must_use]
    pub fn is_internal_error(&self) -> bool {
        matches!(self, Self::IoError | Self::TaskPanicked)
    }
}

impl IndexError {
    /// Create a new indexing error.
    #[must_use]
    pub fn new(path: PathBuf, kind: IndexErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Classify a top-level [`Error`] raised while building one file's record.
    #[must_use]
    pub fn from_error(path: PathBuf, error: &Error) -> Self {
        let kind = match error {
            Error::Parse(_) => IndexErrorKind::ParseFailed,
            Error::NoDeclaredTypes(_) => IndexErrorKind::NoDeclaredTypes,
            Error::Encoding(_) => IndexErrorKind::EncodingError,
            _ => IndexErrorKind::IoError,
        };
        Self::new(path, kind, error.to_string())
    }

    /// Create an error for a task that panicked.
    #[must_use]
    pub fn task_panicked(path: PathBuf, payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self::new(path, IndexErrorKind::TaskPanicked, message)
    }
}
