use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "seedkeeper", version)]
#[command(
    about = "Find media files that lost their hardlink and have them re-downloaded",
    long_about = "Scans a media directory for video files with a single hard link, saves \
                  them to a CSV record and, with --replace, deletes them and asks Radarr \
                  to search for a new copy.\n\nWithout --replace only the record is written."
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory to scan [default: configured root_directory]
    pub directory: Option<PathBuf>,

    /// Replace this many non-hardlinked files
    #[arg(long, value_name = "AMOUNT")]
    pub replace: Option<usize>,

    /// Delete files without asking for confirmation
    #[arg(long, requires = "replace")]
    pub force: bool,

    /// CSV record of non-hardlinked files [default: non_hardlinked_files.csv]
    #[arg(long, value_name = "PATH")]
    pub record: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print configuration values
    PrintConfig,
}
