use std::io;

use thiserror::Error;

/// Fatal build errors.
///
/// A half-built image is never valid and there is no rollback, so every
/// variant aborts the whole run; callers must discard the image file.
#[derive(Error, Debug)]
pub enum FsError {
    /// I/O failure on the backing store or an input file.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// On-disk record encode/decode failure.
    #[error("record codec error: {0}")]
    Codec(#[from] binrw::Error),

    /// Inode allocation past the configured capacity.
    #[error("inode capacity {capacity} exhausted")]
    OutOfInodes { capacity: u32 },

    /// Append past the maximum addressable file size.
    #[error("file exceeds the maximum size of {max_bytes} bytes")]
    FileTooLarge { max_bytes: usize },

    /// The bitmap region cannot represent the used-block count.
    #[error("{used} used blocks exceed the bitmap capacity of {capacity} bits")]
    BitmapOverflow { used: u32, capacity: usize },

    /// Metadata over-provisioned: no room left for data blocks.
    #[error("metadata takes {meta_blocks} of {total_blocks} blocks, leaving no data region")]
    NoDataBlocks { meta_blocks: u64, total_blocks: u32 },

    /// Input names live in a flat namespace.
    #[error("input name {name:?} contains a path separator")]
    NameContainsSeparator { name: String },
}
