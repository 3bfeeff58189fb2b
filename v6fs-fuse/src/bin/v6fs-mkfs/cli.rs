use std::path::PathBuf;

use clap::Parser;

/// Builds a v6fs disk image from a list of host files.
#[derive(Parser)]
pub struct Cli {
    /// Output image path
    pub image: PathBuf,

    /// Files packed into the image's root directory, in order
    pub files: Vec<PathBuf>,

    /// Image size in blocks
    #[arg(long, default_value_t = 1000)]
    pub total_blocks: u32,

    /// Inode capacity
    #[arg(long, default_value_t = 200)]
    pub inodes: u32,

    /// Log region length in blocks
    #[arg(long, default_value_t = 30)]
    pub log_blocks: u32,
}
