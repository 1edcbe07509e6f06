//! Building a [`CompilationInfo`] from one source file.
//!
//! This is the single-file step of phase 1: filter, read, parse, extract.

use std::path::Path;

use regex::Regex;
use tracing::trace;

use crate::error::{Error, Result};
use crate::languages::LanguageSupport;
use crate::languages::java::{
    JavaLanguage, extract_declared_types, extract_imports, extract_package,
    extract_type_references,
};
use crate::parser::SourceParser;
use crate::types::{CompilationInfo, QualifiedType, ResolutionData, TypeTag};

/// Why a source file was left out before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `module-info.java` or `package-info.java`
    MarkerFile,
    /// The path matched a caller-supplied exclusion pattern
    Excluded(String),
}

/// Decide whether a `.java` file is filtered out.
///
/// Exclusion patterns are searched anywhere in the path's display form, so
/// `generated/` excludes every file below any `generated` directory.
#[must_use]
pub fn skip_reason(path: &Path, exclusions: &[Regex]) -> Option<SkipReason> {
    if JavaLanguage.is_marker_file(path) {
        return Some(SkipReason::MarkerFile);
    }

    let display = path.to_string_lossy();
    exclusions
        .iter()
        .find(|pattern| pattern.is_match(&display))
        .map(|pattern| SkipReason::Excluded(pattern.as_str().to_string()))
}

/// Parse a file and extract everything the index stores about it.
///
/// When `source` is `None` the file is read from `path`. The file stem picks
/// the primary type when a unit declares several top-level types.
///
/// # Errors
///
/// - [`Error::Io`] if the file cannot be read
/// - [`Error::Encoding`] if the file is not valid UTF-8
/// - [`Error::Parse`] if the parser rejects the source
/// - [`Error::NoDeclaredTypes`] if the unit declares no type
pub fn build_compilation_info(
    parser: &dyn SourceParser,
    path: &Path,
    source: Option<&str>,
) -> Result<CompilationInfo> {
    let owned;
    let text = match source {
        Some(text) => text,
        None => {
            let bytes = std::fs::read(path)?;
            owned = String::from_utf8(bytes).map_err(|_| Error::Encoding(path.to_path_buf()))?;
            owned.as_str()
        }
    };

    let tree = parser.parse(text)?;
    let content = text.as_bytes();

    let package = extract_package(&tree, content);
    let imports = extract_imports(&tree, content);
    let stem = path.file_stem().and_then(|s| s.to_str());
    let declared = extract_declared_types(&tree, content, stem)
        .ok_or_else(|| Error::NoDeclaredTypes(path.to_path_buf()))?;

    let outer = QualifiedType::in_package(&package, &declared.primary);
    let inner = declared
        .inner
        .iter()
        .map(|name| QualifiedType::new(format!("{}.{name}", outer.name()), TypeTag::ProjectReference))
        .collect();
    let references = extract_type_references(&tree, content);

    trace!(
        file = %path.display(),
        qualified_type = %outer,
        imports = imports.len(),
        references = references.len(),
        "Extracted compilation unit"
    );

    Ok(CompilationInfo::new(
        path.to_path_buf(),
        outer,
        inner,
        ResolutionData::from_imports(package, &imports),
        references,
    ))
}
