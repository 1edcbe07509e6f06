//! Language-specific extraction.
//!
//! The index is built around Java, but the grammar-facing pieces sit behind
//! `LanguageSupport` so the walker and parser never hard-code file names or
//! extensions.

pub mod common;
pub mod java;
pub mod jdk;
pub mod tree_sitter_utils;

use std::path::Path;

/// Trait for language-specific source handling.
pub trait LanguageSupport: Send + Sync {
    /// File extensions this language handles.
    fn extensions(&self) -> &[&str];

    /// Get the tree-sitter language for parsing.
    fn tree_sitter_language(&self) -> tree_sitter::Language;

    /// File names that carry module or package metadata rather than types.
    fn marker_files(&self) -> &[&str];

    /// Whether `path` has one of this language's extensions.
    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }

    /// Whether `path` names a marker file.
    fn is_marker_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.marker_files().contains(&name))
    }
}
