use binrw::binrw;

/// Capacity of the name field.
pub const DIR_NAME_LEN: usize = 14;

/// A fixed-width (inode number, name) pair; a directory's content is a
/// packed sequence of these.
///
/// A name that fills the field exactly carries no terminating NUL.
/// Directory lookup compares the fixed-width field, not a C string, and
/// the kernel-side driver follows the same convention.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub inum: u16,
    name: [u8; DIR_NAME_LEN],
}

impl DirEntry {
    /// Encoded size in bytes.
    pub const SIZE: usize = 16;

    /// Builds an entry, truncating `name` to the field width.
    pub fn new(inum: u16, name: &str) -> Self {
        let bytes = name.as_bytes();
        let len = bytes.len().min(DIR_NAME_LEN);
        let mut field = [0; DIR_NAME_LEN];
        field[..len].copy_from_slice(&bytes[..len]);

        Self { inum, name: field }
    }

    /// Name bytes up to the first NUL, or the whole field if none.
    pub fn name(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(DIR_NAME_LEN);
        &self.name[..len]
    }

    /// The raw fixed-width name field.
    #[inline]
    pub fn raw_name(&self) -> &[u8; DIR_NAME_LEN] {
        &self.name
    }
}
