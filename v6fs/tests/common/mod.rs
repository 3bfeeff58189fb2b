#![allow(dead_code)]

use std::io;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use binrw::BinRead;
use block_dev::BlockDevice;
use v6fs::{
    DirEntry, DiskInode, FsBuilder, Geometry, IndirectBlock, SuperBlock, BLOCK_SIZE, NDIRECT,
};

/// In-memory image, for driving the builder without touching disk.
pub struct MemDisk(Mutex<Vec<u8>>);

impl MemDisk {
    pub fn new(total_blocks: u32) -> Self {
        Self(Mutex::new(vec![0; total_blocks as usize * BLOCK_SIZE]))
    }
}

impl BlockDevice for MemDisk {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> io::Result<()> {
        let data = self.0.lock().unwrap();
        let start = block_id * BLOCK_SIZE;
        buf.copy_from_slice(&data[start..start + BLOCK_SIZE]);
        Ok(())
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> io::Result<()> {
        let mut data = self.0.lock().unwrap();
        let start = block_id * BLOCK_SIZE;
        data[start..start + BLOCK_SIZE].copy_from_slice(buf);
        Ok(())
    }
}

/// A fresh builder over an in-memory image.
pub fn builder(total_blocks: u32, inode_count: u32, log_blocks: u32) -> (Arc<MemDisk>, FsBuilder) {
    let geometry = Geometry::plan(total_blocks, inode_count, log_blocks).unwrap();
    let disk = Arc::new(MemDisk::new(total_blocks));
    let builder = FsBuilder::create(disk.clone(), geometry).unwrap();
    (disk, builder)
}

pub fn read_block(disk: &MemDisk, block_id: usize) -> [u8; BLOCK_SIZE] {
    let mut buf = [0; BLOCK_SIZE];
    disk.read_block(block_id, &mut buf).unwrap();
    buf
}

pub fn read_superblock(disk: &MemDisk) -> SuperBlock {
    let buf = read_block(disk, SuperBlock::BLOCK);
    SuperBlock::read_le(&mut Cursor::new(buf.as_slice())).unwrap()
}

pub fn read_inode(disk: &MemDisk, sb: &SuperBlock, inum: u32) -> DiskInode {
    let per_block = (BLOCK_SIZE / DiskInode::SIZE) as u32;
    let buf = read_block(disk, (sb.inode_start + inum / per_block) as usize);
    let mut cursor = Cursor::new(buf.as_slice());
    cursor.set_position((inum % per_block) as u64 * DiskInode::SIZE as u64);
    DiskInode::read_le(&mut cursor).unwrap()
}

/// Walks an inode's direct and indirect addresses, independently of the
/// builder, the way the kernel-side consumer would.
pub fn read_file(disk: &MemDisk, sb: &SuperBlock, inum: u32) -> Vec<u8> {
    let inode = read_inode(disk, sb, inum);
    let total = inode.size as usize;

    let indirect = (inode.indirect() != 0).then(|| {
        let buf = read_block(disk, inode.indirect() as usize);
        IndirectBlock::read_le(&mut Cursor::new(buf.as_slice())).unwrap()
    });

    let mut out = Vec::with_capacity(total);
    for fbn in 0..total.div_ceil(BLOCK_SIZE) {
        let block_id = if fbn < NDIRECT {
            inode.addrs[fbn]
        } else {
            indirect.as_ref().unwrap().addrs[fbn - NDIRECT]
        };
        let block = read_block(disk, block_id as usize);
        let n = (total - out.len()).min(BLOCK_SIZE);
        out.extend_from_slice(&block[..n]);
    }
    out
}

/// Decodes a directory's content into its packed entries.
pub fn read_dir(disk: &MemDisk, sb: &SuperBlock, inum: u32) -> Vec<DirEntry> {
    assert!(read_inode(disk, sb, inum).is_dir());
    let content = read_file(disk, sb, inum);
    content
        .chunks_exact(DirEntry::SIZE)
        .map(|raw| DirEntry::read_le(&mut Cursor::new(raw)).unwrap())
        .filter(|entry| entry.inum != 0)
        .collect()
}

pub fn bitmap_bit(disk: &MemDisk, sb: &SuperBlock, bit: usize) -> bool {
    let buf = read_block(disk, sb.bitmap_start as usize + bit / (BLOCK_SIZE * 8));
    let inblock = bit % (BLOCK_SIZE * 8);
    buf[inblock / 8] & (1 << (inblock % 8)) != 0
}

/// Deterministic non-repeating byte pattern.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + i / 251) as u8).collect()
}
