use binrw::binrw;

use crate::{BLOCK_SIZE, MAX_FILE_BLOCKS, NDIRECT};

/// On-disk inode record, packed several per table block.
///
/// Block addresses are physical; 0 means "unallocated", real addresses
/// are always at or past the first data block.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskInode {
    pub kind: InodeKind,
    /// Device major number (device inodes only)
    pub major: u16,
    /// Device minor number (device inodes only)
    pub minor: u16,
    /// Hard link count
    pub nlink: u16,
    /// Content size in bytes
    pub size: u32,
    /// `NDIRECT` direct block addresses, then the indirect block address.
    pub addrs: [u32; NDIRECT + 1],
}

impl DiskInode {
    /// Encoded size in bytes.
    pub const SIZE: usize = 64;

    /// Largest content size an inode can address.
    pub const MAX_BYTES: usize = MAX_FILE_BLOCKS * BLOCK_SIZE;

    /// A fresh record: one link, empty, no blocks mapped.
    pub fn new(kind: InodeKind) -> Self {
        Self {
            kind,
            major: 0,
            minor: 0,
            nlink: 1,
            size: 0,
            addrs: [0; NDIRECT + 1],
        }
    }

    /// The indirect block address.
    #[inline]
    pub fn indirect(&self) -> u32 {
        self.addrs[NDIRECT]
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == InodeKind::Directory
    }
}

/// Inode type tag; `Free` marks a never-used table slot.
#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InodeKind {
    #[default]
    #[brw(magic = 0u16)]
    Free,
    #[brw(magic = 1u16)]
    Directory,
    #[brw(magic = 2u16)]
    File,
    #[brw(magic = 3u16)]
    Device,
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};

    use super::*;

    #[test]
    fn kind_encodes_as_u16_tag() {
        let mut buf = Vec::new();
        InodeKind::Directory
            .write_le(&mut Cursor::new(&mut buf))
            .unwrap();
        assert_eq!(vec![1, 0], buf);

        let kind = InodeKind::read_le(&mut Cursor::new([2u8, 0])).unwrap();
        assert_eq!(InodeKind::File, kind);
    }

    #[test]
    fn record_round_trips() {
        let mut inode = DiskInode::new(InodeKind::File);
        inode.size = 600;
        inode.addrs[0] = 59;
        inode.addrs[1] = 60;

        let mut buf = Vec::new();
        inode.write_le(&mut Cursor::new(&mut buf)).unwrap();
        assert_eq!(DiskInode::SIZE, buf.len());

        let decoded = DiskInode::read_le(&mut Cursor::new(buf.as_slice())).unwrap();
        assert_eq!(inode, decoded);
    }
}
