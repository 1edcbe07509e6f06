//! Heuristic qualified-name resolution for Java type references.
//!
//! Maps a syntactic type reference to a [`QualifiedType`] using only the
//! referencing file's imports, its package, and (optionally) the set of
//! types the project index knows about. There is no classpath, so the answer
//! is best-effort and may be wrong for star imports and JDK guesses.
//!
//! ## Priority chain
//!
//! First match wins:
//!
//! 1. primitive keyword
//! 2. `java.lang` wrapper class
//! 3. explicit single-type import (keyed on the first segment of the name)
//! 4. star import whose candidate is registered in the index, in declaration order
//! 5. well-known `java.lang` simple name
//! 6. sibling in the file's own package
//! 7. anything else is `UNKNOWN`
//!
//! Changing the order changes tool output, so it is fixed.

use std::collections::BTreeSet;

use tracing::trace;

use crate::languages::jdk::{JAVA_LANG_PACKAGE, is_java_lang_type};
use crate::types::{CompilationInfo, QualifiedType, ResolutionData, TypeReference, TypeTag};

/// The `java.lang` wrapper classes recognized before any import lookup.
pub const BOXED_PRIMITIVES: &[&str] = &[
    "Integer",
    "Long",
    "Short",
    "Byte",
    "Double",
    "Float",
    "Boolean",
    "Character",
];

/// Read-only view of which qualified types have a registered compilation unit.
pub trait TypeLookup: Sync {
    /// Whether a compilation unit is registered under exactly this name.
    fn contains_type(&self, qualified_type: &QualifiedType) -> bool;
}

/// Resolve one type reference in the context of a file.
///
/// Never fails: references that fit no rule come back as
/// [`QualifiedType::unknown`]. Star imports are only consulted when `index`
/// is provided.
#[must_use]
pub fn resolve(
    reference: &TypeReference,
    data: &ResolutionData,
    index: Option<&dyn TypeLookup>,
) -> QualifiedType {
    match reference {
        TypeReference::Primitive(name) => QualifiedType::new(name.as_str(), TypeTag::Primitive),
        TypeReference::ClassOrInterface(name) => resolve_class_or_interface(name, data, index),
        TypeReference::Other(text) => {
            trace!(reference = %text, "Unrecognized type shape");
            QualifiedType::unknown()
        }
    }
}

fn resolve_class_or_interface(
    name: &str,
    data: &ResolutionData,
    index: Option<&dyn TypeLookup>,
) -> QualifiedType {
    if BOXED_PRIMITIVES.contains(&name) {
        return QualifiedType::new(
            format!("{JAVA_LANG_PACKAGE}.{name}"),
            TypeTag::BoxedPrimitive,
        );
    }

    // `Outer.Inner` is looked up by its outermost segment
    let key = name.split('.').next().unwrap_or(name);
    if let Some(imported) = data.import(key) {
        let resolved = match imported.rsplit_once('.') {
            Some((prefix, _)) => format!("{prefix}.{name}"),
            None => name.to_string(),
        };
        trace!(reference = name, import = imported, resolved = %resolved, "Resolved via explicit import");
        return QualifiedType::new(resolved, TypeTag::ProjectReference);
    }

    if let Some(index) = index {
        for package in data.star_import_packages() {
            let candidate =
                QualifiedType::new(format!("{package}.{name}"), TypeTag::ProjectReference);
            if index.contains_type(&candidate) {
                trace!(reference = name, resolved = %candidate, "Resolved via star import");
                return candidate;
            }
        }
    }

    if is_java_lang_type(name) {
        return QualifiedType::new(format!("{JAVA_LANG_PACKAGE}.{name}"), TypeTag::StdlibGuess);
    }

    QualifiedType::in_package(data.package_name(), name)
}

/// Resolve every type reference of a compilation unit.
#[must_use]
pub fn resolve_used_types(
    info: &CompilationInfo,
    index: Option<&dyn TypeLookup>,
) -> BTreeSet<QualifiedType> {
    info.type_references()
        .iter()
        .map(|reference| resolve(reference, info.resolution_data(), index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::common::ImportDeclaration;
    use rstest::rstest;
    use std::collections::HashSet;

    struct KnownTypes(HashSet<String>);

    impl KnownTypes {
        fn new(names: &[&str]) -> Self {
            Self(names.iter().map(|n| (*n).to_string()).collect())
        }
    }

    impl TypeLookup for KnownTypes {
        fn contains_type(&self, qualified_type: &QualifiedType) -> bool {
            self.0.contains(qualified_type.name())
        }
    }

    fn data(package: &str, imports: &[&str], stars: &[&str]) -> ResolutionData {
        let mut declarations: Vec<_> = imports
            .iter()
            .map(|path| ImportDeclaration::new(*path, false, false, 1))
            .collect();
        declarations.extend(
            stars
                .iter()
                .map(|path| ImportDeclaration::new(*path, false, true, 1)),
        );
        ResolutionData::from_imports(package, &declarations)
    }

    fn class(name: &str) -> TypeReference {
        TypeReference::ClassOrInterface(name.to_string())
    }

    #[rstest]
    #[case::int("int")]
    #[case::long("long")]
    #[case::short("short")]
    #[case::byte("byte")]
    #[case::char("char")]
    #[case::float("float")]
    #[case::double("double")]
    #[case::boolean("boolean")]
    fn primitives_resolve_to_themselves(#[case] name: &str) {
        let resolved = resolve(
            &TypeReference::Primitive(name.to_string()),
            &data("p", &[], &[]),
            None,
        );

        assert_eq!(resolved.name(), name);
        assert_eq!(resolved.tag(), TypeTag::Primitive);
    }

    #[rstest]
    #[case::integer("Integer")]
    #[case::long("Long")]
    #[case::short("Short")]
    #[case::byte("Byte")]
    #[case::double("Double")]
    #[case::float("Float")]
    #[case::boolean("Boolean")]
    #[case::character("Character")]
    fn wrappers_resolve_to_java_lang(#[case] name: &str) {
        let resolved = resolve(&class(name), &data("p", &[], &[]), None);

        assert_eq!(resolved.name(), format!("java.lang.{name}"));
        assert_eq!(resolved.tag(), TypeTag::BoxedPrimitive);
    }

    #[test]
    fn wrapper_wins_over_explicit_import() {
        let resolved = resolve(&class("Integer"), &data("p", &["my.Integer"], &[]), None);

        assert_eq!(resolved.name(), "java.lang.Integer");
        assert_eq!(resolved.tag(), TypeTag::BoxedPrimitive);
    }

    #[rstest]
    #[case::simple("Foo", "a.b.Foo")]
    #[case::nested("Foo.Bar", "a.b.Foo.Bar")]
    #[case::deeply_nested("Foo.Bar.Baz", "a.b.Foo.Bar.Baz")]
    fn explicit_import_resolves_with_original_text(#[case] reference: &str, #[case] expected: &str) {
        let resolved = resolve(&class(reference), &data("p", &["a.b.Foo"], &[]), None);

        assert_eq!(resolved.name(), expected);
        assert_eq!(resolved.tag(), TypeTag::ProjectReference);
    }

    #[test]
    fn explicit_import_wins_over_star_import_and_stdlib() {
        let index = KnownTypes::new(&["x.String"]);
        let resolved = resolve(
            &class("String"),
            &data("p", &["custom.text.String"], &["x"]),
            Some(&index),
        );

        assert_eq!(resolved.name(), "custom.text.String");
    }

    #[test]
    fn star_import_uses_first_registered_candidate_in_declaration_order() {
        let index = KnownTypes::new(&["second.Widget", "third.Widget"]);
        let resolved = resolve(
            &class("Widget"),
            &data("y", &[], &["first", "second", "third"]),
            Some(&index),
        );

        assert_eq!(resolved.name(), "second.Widget");
        assert_eq!(resolved.tag(), TypeTag::ProjectReference);
    }

    #[test]
    fn star_import_matches_registered_inner_type() {
        let index = KnownTypes::new(&["x.Outer.Inner"]);
        let resolved = resolve(&class("Outer.Inner"), &data("y", &[], &["x"]), Some(&index));

        assert_eq!(resolved.name(), "x.Outer.Inner");
    }

    #[test]
    fn star_import_is_ignored_without_index() {
        let resolved = resolve(&class("Widget"), &data("y", &[], &["x"]), None);

        assert_eq!(resolved.name(), "y.Widget");
    }

    #[test]
    fn star_import_beats_stdlib_guess_when_registered() {
        let index = KnownTypes::new(&["x.Process"]);
        let resolved = resolve(&class("Process"), &data("y", &[], &["x"]), Some(&index));

        assert_eq!(resolved.name(), "x.Process");
        assert_eq!(resolved.tag(), TypeTag::ProjectReference);
    }

    #[test]
    fn unmatched_star_import_falls_through_to_stdlib_guess() {
        let index = KnownTypes::new(&[]);
        let resolved = resolve(&class("String"), &data("y", &[], &["x"]), Some(&index));

        assert_eq!(resolved.name(), "java.lang.String");
        assert_eq!(resolved.tag(), TypeTag::StdlibGuess);
    }

    #[test]
    fn unknown_simple_name_falls_back_to_own_package() {
        let resolved = resolve(&class("Widget"), &data("p", &[], &[]), None);

        assert_eq!(resolved.name(), "p.Widget");
        assert_eq!(resolved.tag(), TypeTag::ProjectReference);
    }

    #[test]
    fn default_package_fallback_is_bare_name() {
        let resolved = resolve(&class("Widget"), &data("", &[], &[]), None);

        assert_eq!(resolved.name(), "Widget");
    }

    #[rstest]
    #[case::void("void")]
    #[case::var("var")]
    #[case::wildcard("?")]
    #[case::type_parameter("T")]
    fn other_shapes_are_unknown(#[case] text: &str) {
        let resolved = resolve(
            &TypeReference::Other(text.to_string()),
            &data("p", &[], &[]),
            None,
        );

        assert_eq!(resolved.name(), "UNKNOWN");
        assert_eq!(resolved.tag(), TypeTag::Unknown);
    }
}
