//! Offline constructor of v6fs disk images.
//!
//! Disk layout:
//! boot block | superblock | log | inode table | block bitmap | data

// On-disk data structures
pub mod layout;
pub use layout::{DirEntry, DiskInode, IndirectBlock, InodeKind, SuperBlock, DIR_NAME_LEN};

// Static partition of the image into regions
mod geometry;
pub use geometry::Geometry;

// Single-pass image builder
mod mkfs;
pub use mkfs::FsBuilder;

mod error;
pub use error::FsError;

pub const BLOCK_SIZE: usize = 512;
/// Blocks one bitmap block can account for.
pub const BLOCK_BITS: usize = BLOCK_SIZE * 8;

/// Direct block addresses held inline in an inode.
pub const NDIRECT: usize = 12;
/// Block addresses held by the single indirect block.
pub const NINDIRECT: usize = BLOCK_SIZE / 4;
/// File-size ceiling, in blocks.
pub const MAX_FILE_BLOCKS: usize = NDIRECT + NINDIRECT;

pub const INODES_PER_BLOCK: usize = BLOCK_SIZE / DiskInode::SIZE;

/// The root directory is always the first inode allocated;
/// inode 0 is reserved and never referenced.
pub const ROOT_INODE: u32 = 1;

// Table blocks hold whole records only.
const _: () = assert!(BLOCK_SIZE % DiskInode::SIZE == 0);
const _: () = assert!(BLOCK_SIZE % DirEntry::SIZE == 0);
