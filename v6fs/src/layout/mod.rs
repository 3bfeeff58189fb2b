//! On-disk data structures.
//!
//! Every multi-byte field is stored little-endian regardless of host
//! byte order; the `binrw` record definitions below are the single
//! source of truth for field order and width. The kernel-side driver
//! reading a finished image must match them exactly.

mod super_block;
pub use super_block::SuperBlock;

mod inode;
pub use inode::{DiskInode, InodeKind};

mod dir_entry;
pub use dir_entry::{DirEntry, DIR_NAME_LEN};

mod indirect;
pub use indirect::IndirectBlock;
