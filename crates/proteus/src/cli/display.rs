//! Common display utilities for CLI commands.

use colored::{ColoredString, Colorize};
use proteus::{IndexError, TypeTag};

const MAX_DISPLAY_ITEMS: usize = 25;
const MAX_DISPLAY_ERRORS: usize = 5;

/// Display a bulleted list with truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` items. If there are more, shows
/// "... and N more". If empty, shows the provided `empty_message`.
pub fn print_list(items: impl Iterator<Item = String>, empty_message: &str) {
    let items: Vec<String> = items.collect();
    if items.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for item in items.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {item}", "•".dimmed());
    }

    if items.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            items.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Print the first few per-file errors of a build.
pub fn print_errors(errors: &[IndexError]) {
    if errors.is_empty() {
        return;
    }

    println!();
    println!("{} ({}):", "Errors".red().bold(), errors.len());
    for err in errors.iter().take(MAX_DISPLAY_ERRORS) {
        println!("  {} {}: {}", "•".red(), err.path.display(), err.message);
    }
    if errors.len() > MAX_DISPLAY_ERRORS {
        println!("  ... and {} more", errors.len() - MAX_DISPLAY_ERRORS);
    }
}

/// Package name for display; the default package has no name.
pub fn package_label(name: &str) -> ColoredString {
    if name.is_empty() {
        "<default>".italic()
    } else {
        name.normal()
    }
}

/// Colored classification tag.
pub fn tag_label(tag: TypeTag) -> ColoredString {
    let label = format!("[{tag}]");
    match tag {
        TypeTag::Primitive | TypeTag::BoxedPrimitive => label.dimmed(),
        TypeTag::StdlibGuess => label.blue(),
        TypeTag::ProjectReference => label.green(),
        TypeTag::Unknown => label.yellow(),
    }
}
