use binrw::binrw;

/// The single metadata record describing the image's overall geometry.
///
/// Lives in block 1; block 0 is reserved for boot-stage code and never
/// populated by this tool.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperBlock {
    /// Image size in blocks
    pub total_blocks: u32,
    /// Number of data blocks
    pub data_blocks: u32,
    /// Inode capacity
    pub inode_count: u32,
    /// Log region length in blocks
    pub log_blocks: u32,
    /// First block of the log region
    pub log_start: u32,
    /// First block of the inode table
    pub inode_start: u32,
    /// First block of the block-use bitmap
    pub bitmap_start: u32,
}

impl SuperBlock {
    /// Encoded size in bytes.
    pub const SIZE: usize = 28;

    /// The block the superblock is written to.
    pub const BLOCK: usize = 1;
}
