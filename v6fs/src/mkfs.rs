//! Single-pass image construction.
//!
//! The builder owns the only mutable state of a run: the planned
//! geometry and the two bump cursors (next free inode, next free
//! block). Nothing is ever freed, so both cursors only move forward,
//! and the final block cursor is exactly the exclusive bound of the
//! used-block range recorded in the bitmap.

use std::io::{Cursor, Read};
use std::sync::Arc;

use binrw::{BinRead, BinWrite};
use block_dev::BlockDevice;

use crate::layout::{DirEntry, DiskInode, IndirectBlock, InodeKind};
use crate::{
    FsError, Geometry, SuperBlock, BLOCK_BITS, BLOCK_SIZE, INODES_PER_BLOCK, MAX_FILE_BLOCKS,
    NDIRECT, ROOT_INODE,
};

type Result<T> = std::result::Result<T, FsError>;

type Block = [u8; BLOCK_SIZE];

/// Builds a complete filesystem image in one pass.
pub struct FsBuilder {
    device: Arc<dyn BlockDevice>,
    geometry: Geometry,
    free_inode: u32,
    free_block: u32,
}

impl FsBuilder {
    /// Zeroes the image, writes the superblock, and creates the root
    /// directory with its `.` and `..` entries (root is its own parent).
    pub fn create(device: Arc<dyn BlockDevice>, geometry: Geometry) -> Result<Self> {
        let zeroes: Block = [0; BLOCK_SIZE];
        for block_id in 0..geometry.total_blocks {
            device.write_block(block_id as usize, &zeroes)?;
        }

        let mut buf: Block = [0; BLOCK_SIZE];
        geometry
            .super_block()
            .write_le(&mut Cursor::new(buf.as_mut_slice()))?;
        device.write_block(SuperBlock::BLOCK, &buf)?;

        let mut builder = Self {
            device,
            geometry,
            free_inode: ROOT_INODE,
            free_block: geometry.meta_blocks,
        };

        let root = builder.alloc_inode(InodeKind::Directory)?;
        assert_eq!(ROOT_INODE, root);
        for name in [".", ".."] {
            let entry = encode_entry(&DirEntry::new(root as u16, name))?;
            builder.append(root, &entry)?;
        }

        Ok(builder)
    }

    /// Allocates the next unused inode number, starting at 1.
    ///
    /// The record is initialized with the given kind, one link, size 0
    /// and no mapped blocks, and written back immediately.
    pub fn alloc_inode(&mut self, kind: InodeKind) -> Result<u32> {
        if self.free_inode >= self.geometry.inode_count {
            return Err(FsError::OutOfInodes {
                capacity: self.geometry.inode_count,
            });
        }

        let inum = self.free_inode;
        self.free_inode += 1;
        self.write_inode(inum, &DiskInode::new(kind))?;
        Ok(inum)
    }

    /// Hands out the next free block. Bump only; nothing is ever freed.
    fn alloc_block(&mut self) -> u32 {
        let block_id = self.free_block;
        self.free_block += 1;
        block_id
    }

    /// Block and in-block byte offset of an inode record.
    fn inode_pos(&self, inum: u32) -> (usize, u64) {
        let block_id = self.geometry.inode_start() + inum / INODES_PER_BLOCK as u32;
        let offset = inum as usize % INODES_PER_BLOCK * DiskInode::SIZE;
        (block_id as usize, offset as u64)
    }

    /// Reads one inode record out of its containing table block.
    pub fn read_inode(&self, inum: u32) -> Result<DiskInode> {
        let (block_id, offset) = self.inode_pos(inum);
        let mut buf: Block = [0; BLOCK_SIZE];
        self.device.read_block(block_id, &mut buf)?;

        let mut cursor = Cursor::new(buf.as_slice());
        cursor.set_position(offset);
        Ok(DiskInode::read_le(&mut cursor)?)
    }

    /// Writes one inode record by round-tripping its whole table block;
    /// a partial write would clobber the sibling records in the block.
    pub fn write_inode(&mut self, inum: u32, inode: &DiskInode) -> Result<()> {
        let (block_id, offset) = self.inode_pos(inum);
        let mut buf: Block = [0; BLOCK_SIZE];
        self.device.read_block(block_id, &mut buf)?;

        let mut cursor = Cursor::new(buf.as_mut_slice());
        cursor.set_position(offset);
        inode.write_le(&mut cursor)?;
        self.device.write_block(block_id, &buf)?;
        Ok(())
    }

    /// Appends `bytes` to the inode's content, materializing direct and
    /// indirect block mappings on demand.
    ///
    /// Every touched block is read before being written back, so bytes
    /// stored by an earlier call into a partially filled block survive.
    /// Chunk boundaries are unobservable in the finished image.
    pub fn append(&mut self, inum: u32, bytes: &[u8]) -> Result<()> {
        let mut inode = self.read_inode(inum)?;
        let mut offset = inode.size as usize;
        let mut remaining = bytes;
        log::debug!("append inum {inum} at offset {offset}, {} bytes", bytes.len());

        while !remaining.is_empty() {
            let fbn = offset / BLOCK_SIZE;
            if fbn >= MAX_FILE_BLOCKS {
                return Err(FsError::FileTooLarge {
                    max_bytes: DiskInode::MAX_BYTES,
                });
            }

            let block_id = self.map_block(&mut inode, fbn)? as usize;
            let n1 = remaining.len().min((fbn + 1) * BLOCK_SIZE - offset);

            let mut buf: Block = [0; BLOCK_SIZE];
            self.device.read_block(block_id, &mut buf)?;
            let inblock = offset - fbn * BLOCK_SIZE;
            buf[inblock..inblock + n1].copy_from_slice(&remaining[..n1]);
            self.device.write_block(block_id, &buf)?;

            offset += n1;
            remaining = &remaining[n1..];
        }

        inode.size = offset as u32;
        self.write_inode(inum, &inode)?;
        Ok(())
    }

    /// Resolves the physical block backing logical block `fbn`,
    /// allocating direct slots and the indirect array on demand.
    ///
    /// A freshly allocated indirect block is all zeroes (the whole image
    /// starts zeroed), so its unfilled slots read as unallocated.
    fn map_block(&mut self, inode: &mut DiskInode, fbn: usize) -> Result<u32> {
        if fbn < NDIRECT {
            if inode.addrs[fbn] == 0 {
                inode.addrs[fbn] = self.alloc_block();
            }
            return Ok(inode.addrs[fbn]);
        }

        if inode.addrs[NDIRECT] == 0 {
            inode.addrs[NDIRECT] = self.alloc_block();
        }
        let indirect_id = inode.addrs[NDIRECT] as usize;

        let mut buf: Block = [0; BLOCK_SIZE];
        self.device.read_block(indirect_id, &mut buf)?;
        let mut indirect = IndirectBlock::read_le(&mut Cursor::new(buf.as_slice()))?;

        let slot = fbn - NDIRECT;
        if indirect.addrs[slot] == 0 {
            indirect.addrs[slot] = self.alloc_block();
            indirect.write_le(&mut Cursor::new(buf.as_mut_slice()))?;
            self.device.write_block(indirect_id, &buf)?;
        }
        Ok(indirect.addrs[slot])
    }

    /// Adds one file to the root directory: directory entry first, then
    /// content streamed through [`Self::append`] one block at a time.
    ///
    /// A single leading `_` is stripped from the stored name; packed
    /// binaries are prefixed on the host so the build machine never
    /// mistakes them for its own `rm`, `cat` and friends. The stored
    /// name is truncated to the directory-entry field width.
    pub fn add_file(&mut self, name: &str, reader: &mut dyn Read) -> Result<u32> {
        if name.contains('/') {
            return Err(FsError::NameContainsSeparator {
                name: name.to_owned(),
            });
        }
        let name = name.strip_prefix('_').unwrap_or(name);

        let inum = self.alloc_inode(InodeKind::File)?;
        let entry = encode_entry(&DirEntry::new(inum as u16, name))?;
        self.append(ROOT_INODE, &entry)?;

        let mut buf: Block = [0; BLOCK_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            self.append(inum, &buf[..n])?;
        }

        log::info!("added {name:?} as inode {inum}");
        Ok(inum)
    }

    /// Final fix-ups: round the root directory's size up to a whole
    /// number of blocks and write the block-use bitmap with exactly the
    /// bits `[0, used)` set.
    pub fn finish(mut self) -> Result<()> {
        let mut root = self.read_inode(ROOT_INODE)?;
        root.size = root.size.div_ceil(BLOCK_SIZE as u32) * BLOCK_SIZE as u32;
        self.write_inode(ROOT_INODE, &root)?;

        let used = self.free_block;
        let capacity = self.geometry.bitmap_blocks as usize * BLOCK_BITS;
        if used > self.geometry.total_blocks || used as usize > capacity {
            return Err(FsError::BitmapOverflow { used, capacity });
        }

        log::info!("bitmap: first {used} blocks marked used");
        let bitmap_start = self.geometry.bitmap_start() as usize;
        for index in 0..self.geometry.bitmap_blocks as usize {
            let first_bit = index * BLOCK_BITS;
            let mut buf: Block = [0; BLOCK_SIZE];
            for bit in first_bit..(first_bit + BLOCK_BITS).min(used as usize) {
                buf[(bit - first_bit) / 8] |= 1 << (bit % 8);
            }
            self.device.write_block(bitmap_start + index, &buf)?;
        }

        Ok(())
    }

    /// Exclusive upper bound of the allocated block range so far.
    #[inline]
    pub fn allocated_blocks(&self) -> u32 {
        self.free_block
    }

    /// Exclusive upper bound of the allocated inode range so far.
    #[inline]
    pub fn allocated_inodes(&self) -> u32 {
        self.free_inode
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

fn encode_entry(entry: &DirEntry) -> Result<[u8; DirEntry::SIZE]> {
    let mut buf = [0; DirEntry::SIZE];
    entry.write_le(&mut Cursor::new(buf.as_mut_slice()))?;
    Ok(buf)
}
