//! Tree-sitter parsing coordination.
//!
//! The index never talks to tree-sitter directly; it hands source text to a
//! [`SourceParser`] and treats any [`ParseError`] as "file unavailable".
//!
//! ## Design
//!
//! Tree-sitter parsers are stateful and not `Sync`, so [`JavaParser`] keeps
//! one parser per worker thread and reuses it across files.

use std::cell::RefCell;

use crate::error::ParseError;
use crate::languages::LanguageSupport;
use crate::languages::java::JavaLanguage;
use crate::languages::tree_sitter_utils::first_syntax_error;

/// Turns source text into a syntax tree.
///
/// Implementations are shared by every worker thread of an index build.
pub trait SourceParser: Send + Sync {
    /// Parse a complete compilation unit.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when no usable tree can be produced.
    fn parse(&self, source: &str) -> Result<tree_sitter::Tree, ParseError>;
}

thread_local! {
    static JAVA_PARSER: RefCell<Option<tree_sitter::Parser>> = const { RefCell::new(None) };
}

/// Strict tree-sitter-java parser.
///
/// A tree containing any `ERROR` or `MISSING` node is rejected, so a file
/// with syntax errors is left out of the index instead of contributing
/// half-recovered declarations.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaParser;

impl JavaParser {
    fn new_parser() -> Result<tree_sitter::Parser, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&JavaLanguage.tree_sitter_language())
            .map_err(|e| ParseError::Language(e.to_string()))?;
        Ok(parser)
    }
}

impl SourceParser for JavaParser {
    fn parse(&self, source: &str) -> Result<tree_sitter::Tree, ParseError> {
        JAVA_PARSER.with(|slot| {
            let mut slot = slot.borrow_mut();
            let mut parser = slot.take().map_or_else(Self::new_parser, Ok)?;
            let tree = parser.parse(source, None);
            *slot = Some(parser);

            let tree = tree.ok_or(ParseError::NoTree)?;
            match first_syntax_error(&tree) {
                Some(error) => Err(error),
                None => Ok(tree),
            }
        })
    }
}
