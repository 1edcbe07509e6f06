//! Proteus CLI - Java type resolution from the command line.
//!
//! Proteus indexes a Java source tree with tree-sitter and answers which
//! fully-qualified types each file declares and uses.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Proteus: lightweight semantic index for Java source trees.
#[derive(Parser)]
#[command(name = "proteus")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Source root to index (defaults to current directory)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Worker threads for both build phases (defaults to one per core)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,

    /// Regex of paths to leave out (can be repeated)
    #[arg(short, long, global = true)]
    exclude: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every Java file under the workspace and report counts
    Index,

    /// Show what a type's file declares and uses
    Show {
        /// Qualified type name (e.g., "com.acme.Widget" or "com.acme.Outer$Inner")
        qualified_type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List package names with their file counts
    Packages,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Determine workspace root
    let workspace = match cli.workspace {
        Some(w) => w,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!(
                    "{}: failed to get current directory: {e}",
                    "error".red().bold()
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let options = cli::BuildOptions {
        workspace,
        exclude: cli.exclude,
        threads: cli.threads,
    };

    let result = match cli.command {
        Commands::Index => cli::index::run(&options),
        Commands::Show {
            qualified_type,
            json,
        } => cli::show::run(&options, &qualified_type, json),
        Commands::Packages => cli::packages::run(&options),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
