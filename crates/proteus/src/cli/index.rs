//! `proteus index` command implementation.

use colored::Colorize;

use super::BuildOptions;
use super::display::print_errors;

/// Run the index command.
pub fn run(options: &BuildOptions) -> Result<(), proteus::Error> {
    println!(
        "{} {}...",
        "Indexing".cyan().bold(),
        options.workspace.display()
    );

    let (index, stats) = super::build_index(options)?;

    println!();
    println!(
        "{} {} files, registered {} types, resolved {} references",
        "Indexed".green().bold(),
        stats.files_indexed,
        stats.types_registered,
        stats.references_resolved
    );
    println!(
        "{}: {} ({} workers)",
        "Packages".dimmed(),
        index.stored_package_names().len(),
        index.thread_count()
    );
    println!("{}: {:.2?}", "Duration".dimmed(), stats.duration);

    if stats.files_skipped > 0 {
        println!(
            "{}: {} files (marker files or excluded)",
            "Skipped".yellow(),
            stats.files_skipped
        );
    }

    if !stats.directories_skipped.is_empty() {
        println!(
            "{}: {} directories (unreadable)",
            "Skipped".yellow(),
            stats.directories_skipped.len()
        );
    }

    print_errors(&stats.errors);

    Ok(())
}
