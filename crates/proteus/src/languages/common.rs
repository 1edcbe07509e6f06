//! Extraction types shared between the Java tree-navigation helpers and the index.
//!
//! These represent what is read off a syntax tree, before conversion to the
//! domain model in `crate::types`.

/// An import declaration as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// Dotted path without the trailing `.*` (e.g., `java.util.List` or `java.util`)
    pub path: String,
    /// Whether this is an `import static` declaration
    pub is_static: bool,
    /// Whether this imports a whole package or type (`.*`)
    pub is_star: bool,
    /// Line number (1-indexed)
    pub line: u32,
}

impl ImportDeclaration {
    /// Create an import declaration.
    #[must_use]
    pub fn new(path: impl Into<String>, is_static: bool, is_star: bool, line: u32) -> Self {
        Self {
            path: path.into(),
            is_static,
            is_star,
            line,
        }
    }
}

/// The type declarations of a compilation unit, as needed by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredTypes {
    /// Simple name of the primary top-level type
    pub primary: String,
    /// Nested type names below the primary type, dotted relative to it (e.g., `Inner.Deeper`)
    pub inner: Vec<String>,
}
