//! Java tree-navigation helpers.
//!
//! Reads package, import, declaration and type-reference information off a
//! tree-sitter-java syntax tree. These helpers only extract node fields; all
//! resolution decisions live in `crate::resolver`.

use super::LanguageSupport;
use super::common::{DeclaredTypes, ImportDeclaration};
use super::tree_sitter_utils::{node_line, node_text};
use crate::types::TypeReference;

/// Tree-sitter node kind constants for the Java grammar.
///
/// These match the node types defined in tree-sitter-java.
mod node_kinds {
    // Compilation unit structure
    pub const PACKAGE_DECLARATION: &str = "package_declaration";
    pub const IMPORT_DECLARATION: &str = "import_declaration";
    pub const ASTERISK: &str = "asterisk";
    pub const STATIC: &str = "static";
    pub const IDENTIFIER: &str = "identifier";
    pub const SCOPED_IDENTIFIER: &str = "scoped_identifier";

    // Type declarations
    pub const CLASS_DECLARATION: &str = "class_declaration";
    pub const INTERFACE_DECLARATION: &str = "interface_declaration";
    pub const ENUM_DECLARATION: &str = "enum_declaration";
    pub const RECORD_DECLARATION: &str = "record_declaration";
    pub const ANNOTATION_TYPE_DECLARATION: &str = "annotation_type_declaration";
    pub const ENUM_BODY_DECLARATIONS: &str = "enum_body_declarations";

    // Types
    pub const TYPE_IDENTIFIER: &str = "type_identifier";
    pub const SCOPED_TYPE_IDENTIFIER: &str = "scoped_type_identifier";
    pub const GENERIC_TYPE: &str = "generic_type";
    pub const TYPE_ARGUMENTS: &str = "type_arguments";
    pub const TYPE_PARAMETER: &str = "type_parameter";
    pub const WILDCARD: &str = "wildcard";
    pub const INTEGRAL_TYPE: &str = "integral_type";
    pub const FLOATING_POINT_TYPE: &str = "floating_point_type";
    pub const BOOLEAN_TYPE: &str = "boolean_type";
    pub const VOID_TYPE: &str = "void_type";
}

/// Java language support implementation.
pub struct JavaLanguage;

impl LanguageSupport for JavaLanguage {
    fn extensions(&self) -> &[&str] {
        &["java"]
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_java::LANGUAGE.into()
    }

    fn marker_files(&self) -> &[&str] {
        &["module-info.java", "package-info.java"]
    }
}

/// Whether a node kind declares a type.
fn is_type_declaration(kind: &str) -> bool {
    use node_kinds::{
        ANNOTATION_TYPE_DECLARATION, CLASS_DECLARATION, ENUM_DECLARATION, INTERFACE_DECLARATION,
        RECORD_DECLARATION,
    };

    matches!(
        kind,
        CLASS_DECLARATION
            | INTERFACE_DECLARATION
            | ENUM_DECLARATION
            | RECORD_DECLARATION
            | ANNOTATION_TYPE_DECLARATION
    )
}

/// Dotted text of an `identifier` or `scoped_identifier`, whitespace removed.
fn dotted_name(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    let text = node_text(node, content)?;
    Some(text.chars().filter(|c| !c.is_whitespace()).collect())
}

/// First named child that is a (possibly scoped) identifier.
fn name_child<'tree>(node: &tree_sitter::Node<'tree>) -> Option<tree_sitter::Node<'tree>> {
    use node_kinds::{IDENTIFIER, SCOPED_IDENTIFIER};

    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| matches!(child.kind(), IDENTIFIER | SCOPED_IDENTIFIER));
    found
}

/// Extract the declared package, or an empty string for the default package.
pub fn extract_package(tree: &tree_sitter::Tree, content: &[u8]) -> String {
    use node_kinds::PACKAGE_DECLARATION;

    let root = tree.root_node();
    let mut cursor = root.walk();
    let declaration = root
        .named_children(&mut cursor)
        .find(|child| child.kind() == PACKAGE_DECLARATION);

    declaration
        .as_ref()
        .and_then(name_child)
        .and_then(|name| dotted_name(&name, content))
        .unwrap_or_default()
}

/// Extract import declarations in source order.
pub fn extract_imports(tree: &tree_sitter::Tree, content: &[u8]) -> Vec<ImportDeclaration> {
    use node_kinds::IMPORT_DECLARATION;

    let root = tree.root_node();
    let mut cursor = root.walk();
    root.named_children(&mut cursor)
        .filter(|child| child.kind() == IMPORT_DECLARATION)
        .filter_map(|child| parse_import(&child, content))
        .collect()
}

fn parse_import(node: &tree_sitter::Node, content: &[u8]) -> Option<ImportDeclaration> {
    use node_kinds::{ASTERISK, STATIC};

    let path = dotted_name(&name_child(node)?, content)?;
    let mut is_static = false;
    let mut is_star = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            STATIC => is_static = true,
            ASTERISK => is_star = true,
            _ => {}
        }
    }

    Some(ImportDeclaration::new(
        path,
        is_static,
        is_star,
        node_line(node),
    ))
}

/// Extract the primary type and its nested types.
///
/// The primary type is the top-level declaration named like `file_stem`, or
/// the first top-level declaration when none matches. Returns `None` when the
/// unit declares no types at all.
pub fn extract_declared_types(
    tree: &tree_sitter::Tree,
    content: &[u8],
    file_stem: Option<&str>,
) -> Option<DeclaredTypes> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    let top_level: Vec<(tree_sitter::Node, String)> = root
        .named_children(&mut cursor)
        .filter(|child| is_type_declaration(child.kind()))
        .filter_map(|child| {
            let name = child.child_by_field_name("name")?;
            Some((child, node_text(&name, content)?))
        })
        .collect();

    let (primary, name) = file_stem
        .and_then(|stem| top_level.iter().find(|(_, name)| name == stem))
        .or_else(|| top_level.first())?;

    let mut inner = Vec::new();
    if let Some(body) = primary.child_by_field_name("body") {
        collect_inner_types(&body, content, "", &mut inner);
    }

    Some(DeclaredTypes {
        primary: name.clone(),
        inner,
    })
}

/// Collect member type declarations of a type body, depth-first.
///
/// Local classes inside method bodies are not members and are not visited.
fn collect_inner_types(
    body: &tree_sitter::Node,
    content: &[u8],
    prefix: &str,
    inner: &mut Vec<String>,
) {
    use node_kinds::ENUM_BODY_DECLARATIONS;

    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if member.kind() == ENUM_BODY_DECLARATIONS {
            collect_inner_types(&member, content, prefix, inner);
            continue;
        }
        if !is_type_declaration(member.kind()) {
            continue;
        }
        let Some(name) = member
            .child_by_field_name("name")
            .and_then(|n| node_text(&n, content))
        else {
            continue;
        };

        let qualified = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}.{name}")
        };
        if let Some(member_body) = member.child_by_field_name("body") {
            inner.push(qualified.clone());
            collect_inner_types(&member_body, content, &qualified, inner);
        } else {
            inner.push(qualified);
        }
    }
}

/// Extract every type reference in the unit, in source order.
///
/// Class and interface references are reported with type arguments removed
/// (`Map.Entry<K, V>` becomes `Map.Entry`); the arguments are reported as
/// references of their own.
///
/// The walk keeps its own stack, so expression depth is bounded by memory
/// rather than by the worker thread's stack.
pub fn extract_type_references(tree: &tree_sitter::Tree, content: &[u8]) -> Vec<TypeReference> {
    use node_kinds::{
        BOOLEAN_TYPE, FLOATING_POINT_TYPE, GENERIC_TYPE, IMPORT_DECLARATION, INTEGRAL_TYPE,
        PACKAGE_DECLARATION, SCOPED_TYPE_IDENTIFIER, TYPE_IDENTIFIER, TYPE_PARAMETER, VOID_TYPE,
        WILDCARD,
    };

    let mut refs = Vec::new();
    let mut pending = vec![Visit::Node(tree.root_node())];

    while let Some(visit) = pending.pop() {
        let node = match visit {
            Visit::Node(node) => node,
            Visit::TypeParameterName(node) => {
                if let Some(text) = node_text(&node, content) {
                    refs.push(TypeReference::Other(text));
                }
                continue;
            }
        };

        match node.kind() {
            PACKAGE_DECLARATION | IMPORT_DECLARATION => {}

            INTEGRAL_TYPE | FLOATING_POINT_TYPE | BOOLEAN_TYPE => {
                if let Some(text) = node_text(&node, content) {
                    refs.push(TypeReference::Primitive(text));
                }
            }

            VOID_TYPE => refs.push(TypeReference::Other("void".to_string())),

            TYPE_IDENTIFIER => {
                if let Some(text) = node_text(&node, content) {
                    // `var` is a reserved type name since Java 10, never a class
                    if text == "var" {
                        refs.push(TypeReference::Other(text));
                    } else {
                        refs.push(TypeReference::ClassOrInterface(text));
                    }
                }
            }

            SCOPED_TYPE_IDENTIFIER | GENERIC_TYPE => {
                let segments = type_name_segments(node, content);
                if !segments.is_empty() {
                    refs.push(TypeReference::ClassOrInterface(segments.join(".")));
                }
                let arguments = nested_type_arguments(node);
                pending.extend(arguments.into_iter().rev().map(Visit::Node));
            }

            TYPE_PARAMETER => {
                // The declared parameter name is not a reference; its bounds are
                let children: Vec<_> = named_children(node);
                pending.extend(children.into_iter().rev().map(|child| {
                    if child.kind() == TYPE_IDENTIFIER {
                        Visit::TypeParameterName(child)
                    } else {
                        Visit::Node(child)
                    }
                }));
            }

            WILDCARD => {
                refs.push(TypeReference::Other("?".to_string()));
                pending.extend(named_children(node).into_iter().rev().map(Visit::Node));
            }

            _ => pending.extend(named_children(node).into_iter().rev().map(Visit::Node)),
        }
    }

    refs
}

/// Work item for [`extract_type_references`].
enum Visit<'tree> {
    Node(tree_sitter::Node<'tree>),
    /// The name a `type_parameter` declares
    TypeParameterName(tree_sitter::Node<'tree>),
}

fn named_children(node: tree_sitter::Node<'_>) -> Vec<tree_sitter::Node<'_>> {
    let mut cursor = node.walk();
    let children = node.named_children(&mut cursor).collect();
    children
}

/// Identifier segments of a class type, skipping type arguments.
fn type_name_segments(node: tree_sitter::Node<'_>, content: &[u8]) -> Vec<String> {
    use node_kinds::{GENERIC_TYPE, SCOPED_TYPE_IDENTIFIER, TYPE_IDENTIFIER};

    let mut segments = Vec::new();
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        match node.kind() {
            TYPE_IDENTIFIER => {
                if let Some(text) = node_text(&node, content) {
                    segments.push(text);
                }
            }
            SCOPED_TYPE_IDENTIFIER | GENERIC_TYPE => {
                pending.extend(named_children(node).into_iter().rev());
            }
            _ => {}
        }
    }
    segments
}

/// The `type_arguments` nodes found anywhere inside a class type, in source order.
fn nested_type_arguments(node: tree_sitter::Node<'_>) -> Vec<tree_sitter::Node<'_>> {
    use node_kinds::{GENERIC_TYPE, SCOPED_TYPE_IDENTIFIER, TYPE_ARGUMENTS};

    let mut arguments = Vec::new();
    let mut pending = named_children(node);
    pending.reverse();
    while let Some(child) = pending.pop() {
        match child.kind() {
            TYPE_ARGUMENTS => arguments.push(child),
            SCOPED_TYPE_IDENTIFIER | GENERIC_TYPE => {
                pending.extend(named_children(child).into_iter().rev());
            }
            _ => {}
        }
    }
    arguments
}
