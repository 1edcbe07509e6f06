//! Domain types for the Proteus project index.
//!
//! These types represent the core domain model:
//! - **Values**: `QualifiedType`, `TypeTag`, `TypeReference`
//! - **Per-file records**: `ResolutionData`, `CompilationInfo` (shared via `Arc` by every cache entry)
//! - **Results**: `IndexStats`
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Type identity | Dotted name only | The tag records how a name was derived, not what it names |
//! | Inner separator | `$` | Binary names (`a.b.Outer$Inner`) are the only unambiguous form |
//! | `used_types` | `OnceLock` | Written by exactly one phase-2 task, read freely afterwards |
//! | Collections | `BTreeMap`/`BTreeSet` | Stable iteration order for tool output |

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use serde::Serialize;

use crate::error::IndexError;
use crate::languages::common::ImportDeclaration;

/// Separator between an outer class and its nested classes in binary names.
pub const INNER_CLASS_SEPARATOR: char = '$';

/// Dotted name used for references the resolver cannot classify.
pub const UNKNOWN_TYPE_NAME: &str = "UNKNOWN";

// ============================================================================
// Qualified types
// ============================================================================

/// How a [`QualifiedType`] was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeTag {
    /// Primitive keyword type (`int`, `boolean`, ...)
    Primitive,
    /// One of the `java.lang` wrapper classes
    BoxedPrimitive,
    /// Assumed to live in `java.lang` because the simple name is a known JDK class
    StdlibGuess,
    /// Resolved against an import, the project index, or the file's own package
    ProjectReference,
    /// The reference could not be classified
    Unknown,
}

impl TypeTag {
    /// Stable string form, used for CLI output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "PRIMITIVE",
            Self::BoxedPrimitive => "BOXED_PRIMITIVE",
            Self::StdlibGuess => "STDLIB_GUESS",
            Self::ProjectReference => "PROJECT_REFERENCE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-dotted type name plus the tag describing how it was derived.
///
/// Equality, hashing and ordering look at the dotted name only, so
/// `("a.Foo", PROJECT_REFERENCE)` and `("a.Foo", STDLIB_GUESS)` are the same key.
#[derive(Debug, Clone, Serialize)]
pub struct QualifiedType {
    name: String,
    tag: TypeTag,
}

impl QualifiedType {
    /// Create a qualified type from a dotted name.
    #[must_use]
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }

    /// A project type in `package`, or in the default package when `package` is empty.
    #[must_use]
    pub fn in_package(package: &str, name: &str) -> Self {
        if package.is_empty() {
            Self::new(name, TypeTag::ProjectReference)
        } else {
            Self::new(format!("{package}.{name}"), TypeTag::ProjectReference)
        }
    }

    /// The placeholder returned for unrecognized reference shapes.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_TYPE_NAME, TypeTag::Unknown)
    }

    /// The dotted name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How this name was derived.
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Everything before the first [`INNER_CLASS_SEPARATOR`].
    ///
    /// Names without a separator are returned unchanged. Only binary names
    /// are understood; the index's own dotted inner names
    /// (`a.Outer.Inner`) convert with [`CompilationInfo::binary_name`].
    #[must_use]
    pub fn as_outer_class(&self) -> Self {
        match self.name.split_once(INNER_CLASS_SEPARATOR) {
            Some((outer, _)) => Self::new(outer, self.tag),
            None => self.clone(),
        }
    }

    /// Relative source path where the outer class would conventionally live.
    ///
    /// `a.b.Outer$Inner` becomes `a/b/Outer.java`. Expects a binary name, as
    /// [`as_outer_class`](Self::as_outer_class) does.
    #[must_use]
    pub fn as_path_hint(&self) -> PathBuf {
        let outer = self.as_outer_class();
        let mut path: PathBuf = outer.name.split('.').collect();
        path.set_extension("java");
        path
    }

    /// The substring before the last `.`, empty for undotted names.
    #[must_use]
    pub fn package_of(&self) -> &str {
        self.name.rsplit_once('.').map_or("", |(package, _)| package)
    }

    /// The last name segment, with any binary-name prefix removed.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let last = self.name.rsplit('.').next().unwrap_or(&self.name);
        last.rsplit(INNER_CLASS_SEPARATOR).next().unwrap_or(last)
    }
}

impl PartialEq for QualifiedType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for QualifiedType {}

impl Hash for QualifiedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for QualifiedType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QualifiedType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for QualifiedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Syntactic type references
// ============================================================================

/// A type reference as it appears in source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "shape", content = "text", rename_all = "snake_case")]
pub enum TypeReference {
    /// A primitive keyword type, e.g. `int`
    Primitive(String),
    /// A class or interface name with type arguments removed, e.g. `Map.Entry`
    ClassOrInterface(String),
    /// Anything else that occupies a type position (`void`, `var`, `?`, type parameters)
    Other(String),
}

impl TypeReference {
    /// The reference text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Primitive(text) | Self::ClassOrInterface(text) | Self::Other(text) => text,
        }
    }
}

// ============================================================================
// Per-file resolution data
// ============================================================================

/// Import context of one compilation unit.
///
/// Built once from the unit's import list and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionData {
    package_name: String,
    imports: BTreeMap<String, String>,
    star_import_packages: Vec<String>,
}

impl ResolutionData {
    /// Build resolution data from a package name and the unit's imports, in declaration order.
    ///
    /// Static imports name members rather than types and are ignored. When two
    /// single-type imports share a simple name, the first one is kept.
    #[must_use]
    pub fn from_imports(package_name: impl Into<String>, imports: &[ImportDeclaration]) -> Self {
        let mut explicit = BTreeMap::new();
        let mut star_import_packages = Vec::new();

        for import in imports.iter().filter(|i| !i.is_static) {
            if import.is_star {
                star_import_packages.push(import.path.clone());
            } else {
                let simple = import
                    .path
                    .rsplit_once('.')
                    .map_or(import.path.as_str(), |(_, simple)| simple);
                explicit
                    .entry(simple.to_string())
                    .or_insert_with(|| import.path.clone());
            }
        }

        Self {
            package_name: package_name.into(),
            imports: explicit,
            star_import_packages,
        }
    }

    /// Declared package, empty for the default package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Qualified name imported under `simple_name`, if any.
    #[must_use]
    pub fn import(&self, simple_name: &str) -> Option<&str> {
        self.imports.get(simple_name).map(String::as_str)
    }

    /// Explicit imports keyed by simple name.
    #[must_use]
    pub fn imports(&self) -> &BTreeMap<String, String> {
        &self.imports
    }

    /// Star-import package prefixes in declaration order.
    #[must_use]
    pub fn star_import_packages(&self) -> &[String] {
        &self.star_import_packages
    }
}

// ============================================================================
// Compilation info
// ============================================================================

static NO_USED_TYPES: BTreeSet<QualifiedType> = BTreeSet::new();

/// The index's record about one successfully parsed source file.
///
/// One instance is shared (via `Arc`) by the path-cache entry and every
/// type-cache entry the file contributes.
#[derive(Debug, PartialEq, Eq)]
pub struct CompilationInfo {
    path: PathBuf,
    qualified_type: QualifiedType,
    inner_qualified_types: BTreeSet<QualifiedType>,
    resolution_data: ResolutionData,
    type_references: Vec<TypeReference>,
    used_types: OnceLock<BTreeSet<QualifiedType>>,
}

impl CompilationInfo {
    pub(crate) fn new(
        path: PathBuf,
        qualified_type: QualifiedType,
        inner_qualified_types: BTreeSet<QualifiedType>,
        resolution_data: ResolutionData,
        type_references: Vec<TypeReference>,
    ) -> Self {
        Self {
            path,
            qualified_type,
            inner_qualified_types,
            resolution_data,
            type_references,
            used_types: OnceLock::new(),
        }
    }

    /// Source path as it was discovered or registered.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file's primary (outer) type.
    #[must_use]
    pub fn qualified_type(&self) -> &QualifiedType {
        &self.qualified_type
    }

    /// Nested types declared inside the primary type, qualified as `outer.inner`.
    #[must_use]
    pub fn inner_qualified_types(&self) -> &BTreeSet<QualifiedType> {
        &self.inner_qualified_types
    }

    /// Binary form of a type this file declares.
    ///
    /// The dotted inner name `a.Outer.Inner.Deeper` becomes
    /// `a.Outer$Inner$Deeper`; the primary type is returned as is. Returns
    /// `None` for types declared elsewhere.
    #[must_use]
    pub fn binary_name(&self, declared: &QualifiedType) -> Option<QualifiedType> {
        if *declared == self.qualified_type {
            return Some(self.qualified_type.clone());
        }
        let inner = self.inner_qualified_types.get(declared)?;
        let outer = self.qualified_type.name();
        let nested = inner.name().strip_prefix(outer)?.strip_prefix('.')?;
        let separator = INNER_CLASS_SEPARATOR.to_string();
        Some(QualifiedType::new(
            format!("{outer}{separator}{}", nested.replace('.', &separator)),
            inner.tag(),
        ))
    }

    /// The primary type followed by every inner type.
    pub fn declared_types(&self) -> impl Iterator<Item = &QualifiedType> {
        std::iter::once(&self.qualified_type).chain(&self.inner_qualified_types)
    }

    /// Package and import context of the file.
    #[must_use]
    pub fn resolution_data(&self) -> &ResolutionData {
        &self.resolution_data
    }

    /// Every type reference found in the file, in source order.
    #[must_use]
    pub fn type_references(&self) -> &[TypeReference] {
        &self.type_references
    }

    /// Resolved types referenced by the file.
    ///
    /// Empty until the resolve phase has run for this file.
    #[must_use]
    pub fn used_types(&self) -> &BTreeSet<QualifiedType> {
        self.used_types.get().unwrap_or(&NO_USED_TYPES)
    }

    /// Whether the resolve phase has filled `used_types`.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.used_types.get().is_some()
    }

    /// Fill `used_types`. Returns `false` if it was already set.
    pub(crate) fn set_used_types(&self, used: BTreeSet<QualifiedType>) -> bool {
        self.used_types.set(used).is_ok()
    }
}

// ============================================================================
// Results
// ============================================================================

/// Statistics from an indexing operation.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Number of files registered in the index
    pub files_indexed: usize,
    /// Number of `.java` files skipped by marker-file or exclusion filters
    pub files_skipped: usize,
    /// Number of type-cache entries after the build
    pub types_registered: usize,
    /// Number of type references resolved in phase 2
    pub references_resolved: usize,
    /// Time taken
    pub duration: Duration,
    /// Directories that could not be read (path, reason)
    pub directories_skipped: Vec<(PathBuf, String)>,
    /// Per-file errors encountered in either phase
    pub errors: Vec<IndexError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn import(path: &str) -> ImportDeclaration {
        ImportDeclaration::new(path, false, false, 1)
    }

    #[test]
    fn equality_ignores_tag() {
        let a = QualifiedType::new("a.Foo", TypeTag::ProjectReference);
        let b = QualifiedType::new("a.Foo", TypeTag::StdlibGuess);

        assert_eq!(a, b);
        let set: BTreeSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn as_outer_class_strips_binary_inner_suffix() {
        let inner = QualifiedType::new("a.b.Outer$Inner$Deeper", TypeTag::ProjectReference);
        assert_eq!(inner.as_outer_class().name(), "a.b.Outer");

        let plain = QualifiedType::new("a.b.Outer", TypeTag::ProjectReference);
        assert_eq!(plain.as_outer_class(), plain);
    }

    #[test]
    fn as_path_hint_uses_outer_class() {
        let inner = QualifiedType::new("a.b.Outer$Inner", TypeTag::ProjectReference);
        assert_eq!(inner.as_path_hint(), Path::new("a").join("b").join("Outer.java"));
    }

    #[test]
    fn package_of_returns_prefix_before_last_dot() {
        let t = QualifiedType::new("com.acme.Widget", TypeTag::ProjectReference);
        assert_eq!(t.package_of(), "com.acme");

        let undotted = QualifiedType::new("Widget", TypeTag::ProjectReference);
        assert_eq!(undotted.package_of(), "");
    }

    #[test]
    fn simple_name_drops_package_and_outer_class() {
        assert_eq!(
            QualifiedType::new("a.b.Outer$Inner", TypeTag::ProjectReference).simple_name(),
            "Inner"
        );
        assert_eq!(
            QualifiedType::new("a.b.Widget", TypeTag::ProjectReference).simple_name(),
            "Widget"
        );
    }

    #[test]
    fn in_package_handles_default_package() {
        assert_eq!(QualifiedType::in_package("", "Main").name(), "Main");
        assert_eq!(QualifiedType::in_package("p", "Main").name(), "p.Main");
    }

    #[test]
    fn resolution_data_splits_explicit_and_star_imports() {
        let data = ResolutionData::from_imports(
            "app",
            &[
                import("a.b.Foo"),
                ImportDeclaration::new("x.y", false, true, 2),
                ImportDeclaration::new("java.util.Collections.emptyList", true, false, 3),
                ImportDeclaration::new("w", false, true, 4),
            ],
        );

        assert_eq!(data.package_name(), "app");
        assert_eq!(data.import("Foo"), Some("a.b.Foo"));
        assert_eq!(data.import("emptyList"), None);
        assert_eq!(data.star_import_packages(), ["x.y", "w"]);
        assert!(data.imports().keys().all(|k| !k.contains('.')));
    }

    #[test]
    fn resolution_data_keeps_first_duplicate_import() {
        let data = ResolutionData::from_imports("", &[import("a.List"), import("b.List")]);
        assert_eq!(data.import("List"), Some("a.List"));
    }

    #[test]
    fn binary_name_converts_dotted_inner_types() {
        let outer = QualifiedType::new("a.Outer", TypeTag::ProjectReference);
        let inner: BTreeSet<_> = ["a.Outer.Inner", "a.Outer.Inner.Deeper"]
            .into_iter()
            .map(|name| QualifiedType::new(name, TypeTag::ProjectReference))
            .collect();
        let info = CompilationInfo::new(
            PathBuf::from("a/Outer.java"),
            outer.clone(),
            inner,
            ResolutionData::default(),
            Vec::new(),
        );

        let deeper = QualifiedType::new("a.Outer.Inner.Deeper", TypeTag::ProjectReference);
        let binary = info.binary_name(&deeper).expect("declared inner type");
        assert_eq!(binary.name(), "a.Outer$Inner$Deeper");
        assert_eq!(binary.as_outer_class(), outer);
        assert_eq!(binary.as_path_hint(), Path::new("a").join("Outer.java"));

        assert_eq!(info.binary_name(&outer), Some(outer.clone()));
        let foreign = QualifiedType::new("b.Other", TypeTag::ProjectReference);
        assert_eq!(info.binary_name(&foreign), None);
    }

    #[test]
    fn used_types_are_set_exactly_once() {
        let info = CompilationInfo::new(
            PathBuf::from("A.java"),
            QualifiedType::new("A", TypeTag::ProjectReference),
            BTreeSet::new(),
            ResolutionData::default(),
            Vec::new(),
        );
        assert!(!info.is_resolved());
        assert!(info.used_types().is_empty());

        let first: BTreeSet<_> = [QualifiedType::new("int", TypeTag::Primitive)].into();
        assert!(info.set_used_types(first));
        assert!(!info.set_used_types(BTreeSet::new()));

        assert!(info.is_resolved());
        assert_eq!(info.used_types().len(), 1);
    }

    proptest! {
        #[test]
        fn outer_class_is_idempotent(name in "[a-z]{1,4}(\\.[a-z]{1,4}){0,3}(\\$[A-Z][a-z]{0,4}){0,3}") {
            let t = QualifiedType::new(name, TypeTag::ProjectReference);
            let outer = t.as_outer_class();
            prop_assert!(!outer.name().contains(INNER_CLASS_SEPARATOR));
            prop_assert_eq!(outer.as_outer_class(), outer.clone());
            prop_assert!(t.name().starts_with(outer.name()));
        }

        #[test]
        fn package_is_a_strict_prefix(name in "[a-z]{1,4}(\\.[a-zA-Z]{1,4}){1,4}") {
            let t = QualifiedType::new(name.clone(), TypeTag::ProjectReference);
            let package = t.package_of();
            prop_assert!(name.starts_with(package));
            prop_assert_eq!(&name[package.len()..package.len() + 1], ".");
        }
    }
}
