//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Extract directory structure and class diagrams from zipped codebases
#[derive(Parser, Debug)]
#[command(name = "infera")]
#[command(about = "Extract directory structure and class diagrams from zipped codebases")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// How `analyze` prints its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Status envelope with structure and diagram
    Json,
    /// Diagram text only
    Mermaid,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a zip archive (or a stored upload) and print the results
    Analyze {
        /// Path to the zip archive
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        archive: Option<PathBuf>,

        /// Analyze a stored upload by id instead of a path
        #[arg(long)]
        id: Option<u64>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep the platform's directory listing order
        #[arg(long)]
        no_sort: bool,

        /// Leave module-level function nodes out of the diagram
        #[arg(long)]
        no_module_functions: bool,

        /// Directory to stage archives in
        #[arg(long)]
        temp_dir: Option<PathBuf>,

        /// Upload directory (used with --id)
        #[arg(long)]
        uploads_dir: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Store an archive in the upload directory
    Upload {
        /// Archive to store
        file: PathBuf,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Upload directory
        #[arg(long)]
        uploads_dir: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List stored uploads
    Uploads {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Upload directory
        #[arg(long)]
        uploads_dir: Option<PathBuf>,
    },

    /// Show version information
    Version,
}
