use binrw::binrw;

use crate::NINDIRECT;

/// A data block repurposed to hold an array of further block addresses,
/// extending addressable file size past the inline direct capacity.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectBlock {
    pub addrs: [u32; NINDIRECT],
}
