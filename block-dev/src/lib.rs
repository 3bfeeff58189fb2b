use std::io;

/// Block-granular access to an image backing store.
///
/// `buf` always covers exactly one block; partial reads or writes are
/// not part of the interface.
pub trait BlockDevice: Send + Sync {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> io::Result<()>;

    fn write_block(&self, block_id: usize, buf: &[u8]) -> io::Result<()>;
}
