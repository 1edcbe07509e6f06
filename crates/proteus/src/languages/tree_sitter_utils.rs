//! Shared tree-sitter utilities for the extraction helpers.
//!
//! Provides common functions for extracting text and positions from tree-sitter nodes.

// Tree-sitter returns usize for positions, but we report u32 for compactness.
// This is safe for practical source files (no file has 4 billion lines).
#![allow(clippy::cast_possible_truncation)]

use crate::error::ParseError;

/// Get text content of a tree-sitter node.
///
/// Returns `None` if the node's byte range contains invalid UTF-8.
pub fn node_text(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    match std::str::from_utf8(&content[node.byte_range()]) {
        Ok(s) => Some(s.to_string()),
        Err(e) => {
            tracing::trace!(
                byte_range = ?node.byte_range(),
                error = %e,
                node_kind = %node.kind(),
                "Failed to decode node text as UTF-8"
            );
            None
        }
    }
}

/// 1-indexed line of a node's start position.
pub fn node_line(node: &tree_sitter::Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Find the first `ERROR` or `MISSING` node in a tree, in document order.
///
/// Returns `None` for a clean tree.
pub fn first_syntax_error(tree: &tree_sitter::Tree) -> Option<ParseError> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }

    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            let position = node.start_position();
            return Some(ParseError::Syntax {
                line: position.row as u32 + 1,
                column: position.column as u32 + 1,
                kind: if node.is_missing() {
                    format!("missing {}", node.kind())
                } else {
                    node.kind().to_string()
                },
            });
        }

        // Only descend into subtrees that contain the error
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                // has_error() on the root guarantees a hit before this point
                let position = root.start_position();
                return Some(ParseError::Syntax {
                    line: position.row as u32 + 1,
                    column: position.column as u32 + 1,
                    kind: root.kind().to_string(),
                });
            }
        }
    }
}
