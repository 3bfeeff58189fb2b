use crate::layout::SuperBlock;
use crate::{FsError, BLOCK_BITS, INODES_PER_BLOCK};

/// Static partition of the image into metadata and data regions.
///
/// Region starts are always derived, never hand-tuned, so the sum
/// invariant `meta_blocks + data_blocks == total_blocks` holds for any
/// accepted parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub total_blocks: u32,
    pub inode_count: u32,
    pub log_blocks: u32,
    /// Blocks holding the inode table
    pub inode_table_blocks: u32,
    /// Blocks holding the block-use bitmap
    pub bitmap_blocks: u32,
    /// Boot + superblock + log + inode table + bitmap
    pub meta_blocks: u32,
    pub data_blocks: u32,
}

impl Geometry {
    /// Plans the region split for an image of `total_blocks` blocks.
    ///
    /// Fails when the metadata regions would leave no room for data.
    pub fn plan(total_blocks: u32, inode_count: u32, log_blocks: u32) -> Result<Self, FsError> {
        let inode_table_blocks = inode_count.div_ceil(INODES_PER_BLOCK as u32);
        let bitmap_blocks = total_blocks.div_ceil(BLOCK_BITS as u32).max(1);

        // Parameters come straight off the command line; sum in u64 so an
        // absurd log length reports over-provisioning instead of wrapping.
        let meta_blocks = 2 + u64::from(log_blocks)
            + u64::from(inode_table_blocks)
            + u64::from(bitmap_blocks);
        if meta_blocks >= u64::from(total_blocks) {
            return Err(FsError::NoDataBlocks {
                meta_blocks,
                total_blocks,
            });
        }
        let meta_blocks = meta_blocks as u32;

        Ok(Self {
            total_blocks,
            inode_count,
            log_blocks,
            inode_table_blocks,
            bitmap_blocks,
            meta_blocks,
            data_blocks: total_blocks - meta_blocks,
        })
    }

    /// First block of the log region.
    #[inline]
    pub fn log_start(&self) -> u32 {
        2
    }

    /// First block of the inode table.
    #[inline]
    pub fn inode_start(&self) -> u32 {
        2 + self.log_blocks
    }

    /// First block of the block-use bitmap.
    #[inline]
    pub fn bitmap_start(&self) -> u32 {
        2 + self.log_blocks + self.inode_table_blocks
    }

    /// The superblock record describing this geometry.
    pub fn super_block(&self) -> SuperBlock {
        SuperBlock {
            total_blocks: self.total_blocks,
            data_blocks: self.data_blocks,
            inode_count: self.inode_count,
            log_blocks: self.log_blocks,
            log_start: self.log_start(),
            inode_start: self.inode_start(),
            bitmap_start: self.bitmap_start(),
        }
    }
}
