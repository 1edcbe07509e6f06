//! `proteus show` command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;
use proteus::{CompilationInfo, QualifiedType, TypeTag};
use serde::Serialize;

use super::BuildOptions;
use super::display::{package_label, print_list, tag_label};

/// JSON shape of `proteus show --json`.
#[derive(Serialize)]
struct ShowOutput<'a> {
    file: PathBuf,
    qualified_type: &'a QualifiedType,
    inner_types: Vec<&'a QualifiedType>,
    package: &'a str,
    imports: &'a BTreeMap<String, String>,
    star_imports: &'a [String],
    used_types: Vec<&'a QualifiedType>,
}

impl<'a> ShowOutput<'a> {
    fn new(info: &'a CompilationInfo) -> Self {
        let data = info.resolution_data();
        Self {
            file: info.path().to_path_buf(),
            qualified_type: info.qualified_type(),
            inner_types: info.inner_qualified_types().iter().collect(),
            package: data.package_name(),
            imports: data.imports(),
            star_imports: data.star_import_packages(),
            used_types: info.used_types().iter().collect(),
        }
    }
}

/// Run the show command.
pub fn run(options: &BuildOptions, name: &str, json: bool) -> Result<(), proteus::Error> {
    let (index, _stats) = super::build_index(options)?;

    let query = QualifiedType::new(name, TypeTag::ProjectReference);
    let Some(info) = index.by_qualified_type(&query) else {
        return Err(proteus::Error::InvalidArgument(format!(
            "type not found in index: {name}"
        )));
    };

    let output = ShowOutput::new(&info);
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}",
        output.qualified_type.name().white().bold(),
        format!("({})", output.file.display()).dimmed()
    );
    println!("  {}: {}", "Package".cyan(), package_label(output.package));

    println!("  {}:", "Inner types".cyan());
    print_list(
        output.inner_types.iter().map(|t| t.name().to_string()),
        "none",
    );

    println!("  {}:", "Imports".cyan());
    print_list(
        output
            .imports
            .iter()
            .map(|(simple, qualified)| format!("{simple} → {qualified}"))
            .chain(output.star_imports.iter().map(|p| format!("{p}.*"))),
        "none",
    );

    println!("  {}:", "Used types".cyan());
    print_list(
        output
            .used_types
            .iter()
            .map(|t| format!("{} {}", t.name(), tag_label(t.tag()))),
        "none",
    );

    Ok(())
}
