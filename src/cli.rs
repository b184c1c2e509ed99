use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery-util")]
#[command(author, version, about = "Photo gallery thumbnail generation and publishing")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate thumbnails for a file or directory and publish them
    Process {
        /// Image file or directory of images
        #[arg(required = true)]
        source: PathBuf,

        /// Thumbnail width in pixels
        #[arg(short, long)]
        width: Option<u32>,

        /// AVIF quality (0-100)
        #[arg(short, long)]
        quality: Option<u32>,

        /// Encoder effort (0-9, higher is slower and smaller)
        #[arg(short, long)]
        effort: Option<u32>,

        /// Semicolon-separated collections to add the photos to
        #[arg(short = 'C', long)]
        collections: Option<String>,

        /// Camera model recorded for every photo
        #[arg(long)]
        camera_model: Option<String>,

        /// Generate thumbnails without touching D1 or object storage
        #[arg(long, conflicts_with = "upload_only")]
        offline_only: bool,

        /// Publish existing thumbnails without generating any
        #[arg(long)]
        upload_only: bool,

        /// Regenerate thumbnails that already exist
        #[arg(long)]
        overwrite: bool,

        /// Print the planned SQL statements without sending anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Create the gallery tables in D1
    InitDb {
        /// Print the statements without sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}
