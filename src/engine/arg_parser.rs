use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Copy photos and videos off a memory card into date/event folders, and clean up orphaned RAW files.
#[derive(Clone, Parser)]
#[command(name = "cardcopy", version)]
#[command(about = "Ingest a memory card into {date}_{event} folders with verified copies.")]
pub struct Cli {
    /// Settings file. Default: `cardcopy.toml` in the working directory, if present.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Copy media from the card into the image and video targets.
    Ingest(IngestArgs),

    /// List the capture dates (YYYYMMDD) of media on the card.
    Dates {
        /// Card root. Default: `sd_card_directory` from the settings file.
        #[arg(long, short = 's', value_name = "DIR")]
        source: Option<PathBuf>,
    },

    /// Find and handle CR3 files without a same-named JPG.
    #[command(subcommand)]
    Orphans(OrphanCommands),
}

#[derive(Clone, clap::Args)]
pub struct IngestArgs {
    /// Event label appended to each date folder (`20240115_<EVENT>`).
    #[arg(long, short = 'e')]
    pub event: String,

    /// Card root. Default: `sd_card_directory` from the settings file.
    #[arg(long, short = 's', value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Image target root. Default: settings file, else the desktop.
    #[arg(long, short = 'i', value_name = "DIR")]
    pub images: Option<PathBuf>,

    /// Video target root. Default: settings file, else the desktop.
    #[arg(long, short = 'm', value_name = "DIR")]
    pub videos: Option<PathBuf>,

    /// Only copy files from these dates (YYYYMMDD). Repeatable. Default: all dates.
    #[arg(long = "date", short = 'd', value_name = "YYYYMMDD")]
    pub dates: Vec<String>,

    /// Put images into JPG/ and RAW/ subfolders.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub separate_raw: Option<bool>,

    /// Verify every copy by SHA-256.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verify: Option<bool>,
}

#[derive(Clone, Subcommand)]
pub enum OrphanCommands {
    /// Report JPG/CR3 counts and the orphaned CR3 files.
    Scan {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Move orphaned CR3 files to the system trash.
    Trash {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Move orphaned CR3 files into another directory.
    Move {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Destination directory.
        #[arg(long, value_name = "DEST")]
        to: Option<PathBuf>,
    },
}
