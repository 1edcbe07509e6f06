//! CLI command implementations.

mod display;

pub mod index;
pub mod packages;
pub mod show;

use std::path::PathBuf;

use proteus::{IndexStats, ProjectIndex, Settings};
use tracing::debug;

/// Options shared by every command that builds an index.
pub struct BuildOptions {
    /// Source root
    pub workspace: PathBuf,
    /// Exclusion patterns from the command line
    pub exclude: Vec<String>,
    /// Worker count from the command line
    pub threads: Option<usize>,
}

/// Merge the workspace settings file with the flags and build the index.
pub fn build_index(options: &BuildOptions) -> Result<(ProjectIndex, IndexStats), proteus::Error> {
    let settings =
        Settings::load(&options.workspace)?.merge(options.exclude.clone(), options.threads);
    debug!(?settings, "Resolved settings");

    let mut index = ProjectIndex::new(settings.into_config()?)?;
    let stats = index.initialize(&options.workspace)?;
    Ok((index, stats))
}
