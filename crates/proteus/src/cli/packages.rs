//! `proteus packages` command implementation.

use colored::Colorize;

use super::BuildOptions;
use super::display::package_label;

/// Run the packages command.
pub fn run(options: &BuildOptions) -> Result<(), proteus::Error> {
    let (index, _stats) = super::build_index(options)?;

    let packages = index.stored_package_names();
    if packages.is_empty() {
        println!("{}", "No packages indexed".dimmed());
        return Ok(());
    }

    println!("{} ({}):", "Packages".cyan().bold(), packages.len());
    for name in &packages {
        let files = index.package_usage(name);
        println!(
            "  {} {} {}",
            "•".dimmed(),
            package_label(name),
            format!("({files} {})", if files == 1 { "file" } else { "files" }).dimmed()
        );
    }

    Ok(())
}
