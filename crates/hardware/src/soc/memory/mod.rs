//! Physical System Memory (RAM).
//!
//! Guest RAM is a single contiguous, zero-initialised byte array mapped at a physical
//! base address. All accesses are little-endian and bounds-checked; an access that
//! does not fit entirely inside the array yields `None` and the caller decides which
//! error to raise.

use crate::common::data::Width;

/// Guest physical memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    /// The base physical address where this memory is mapped.
    base: u64,
    /// Backing bytes; index 0 corresponds to `base`.
    data: Vec<u8>,
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("base", &format_args!("{:#x}", self.base))
            .field("size", &format_args!("{:#x}", self.data.len()))
            .finish()
    }
}

impl Memory {
    /// Creates `size` bytes of zeroed RAM mapped at `base`.
    pub fn new(base: u64, size: u64) -> Self {
        Self {
            base,
            data: vec![0; size as usize],
        }
    }

    /// First physical address of RAM.
    #[inline]
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Size of RAM in bytes.
    #[inline]
    pub const fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// One past the last physical address of RAM.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.base + self.data.len() as u64
    }

    /// Translates `[addr, addr + len)` into an index range, if it lies inside RAM.
    fn offset(&self, addr: u64, len: usize) -> Option<usize> {
        let off = addr.checked_sub(self.base)?;
        let end = off.checked_add(len as u64)?;
        (end <= self.size()).then_some(off as usize)
    }

    /// Returns whether `[addr, addr + len)` lies entirely inside RAM.
    pub fn contains(&self, addr: u64, len: usize) -> bool {
        self.offset(addr, len).is_some()
    }

    /// Reads a little-endian value of the given width, zero-extended to 64 bits.
    pub fn read(&self, addr: u64, width: Width) -> Option<u64> {
        let n = width.bytes();
        let off = self.offset(addr, n)?;
        let mut buf = [0u8; 8];
        buf[..n].copy_from_slice(&self.data[off..off + n]);
        Some(u64::from_le_bytes(buf))
    }

    /// Writes the low `width` bytes of `val` in little-endian order.
    pub fn write(&mut self, addr: u64, width: Width, val: u64) -> Option<()> {
        let n = width.bytes();
        let off = self.offset(addr, n)?;
        self.data[off..off + n].copy_from_slice(&val.to_le_bytes()[..n]);
        Some(())
    }

    /// Copies `bytes` into RAM starting at `addr`.
    pub fn load(&mut self, addr: u64, bytes: &[u8]) -> Option<()> {
        let off = self.offset(addr, bytes.len())?;
        self.data[off..off + bytes.len()].copy_from_slice(bytes);
        Some(())
    }

    /// Zeroes `len` bytes starting at `addr`.
    pub fn fill_zero(&mut self, addr: u64, len: usize) -> Option<()> {
        let off = self.offset(addr, len)?;
        self.data[off..off + len].fill(0);
        Some(())
    }

    /// Borrows `len` bytes starting at `addr`.
    pub fn slice(&self, addr: u64, len: usize) -> Option<&[u8]> {
        let off = self.offset(addr, len)?;
        Some(&self.data[off..off + len])
    }
}
