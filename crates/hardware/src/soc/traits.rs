//! Device trait for memory-mapped I/O.
//!
//! This module defines the `Device` trait implemented by all bus-attached peripherals. It provides:
//! 1. **Identification:** `name` and `address_range` for bus routing.
//! 2. **Access:** Byte, half, word, and doubleword read/write at device-relative offsets.
//! 3. **Lifecycle:** `update`, called once per retired instruction.
//!
//! Only `read_u8` and `write_u8` are required; wider accesses default to little-endian
//! compositions of byte accesses.

/// Trait for memory-mapped I/O devices attached to the system bus.
pub trait Device {
    /// Returns a short name for this device (e.g., `"serial"`, `"rtc"`).
    fn name(&self) -> &str;

    /// Returns `(base_address, size_in_bytes)` for this device's MMIO window.
    fn address_range(&self) -> (u64, u64);

    /// Reads one byte at the given device-relative offset.
    fn read_u8(&mut self, offset: u64) -> u8;

    /// Writes one byte at the given device-relative offset.
    fn write_u8(&mut self, offset: u64, val: u8);

    /// Reads two bytes (little-endian) at the given offset.
    fn read_u16(&mut self, offset: u64) -> u16 {
        u16::from_le_bytes([self.read_u8(offset), self.read_u8(offset + 1)])
    }

    /// Reads four bytes (little-endian) at the given offset.
    fn read_u32(&mut self, offset: u64) -> u32 {
        let lo = self.read_u16(offset) as u32;
        let hi = self.read_u16(offset + 2) as u32;
        lo | (hi << 16)
    }

    /// Reads eight bytes (little-endian) at the given offset.
    fn read_u64(&mut self, offset: u64) -> u64 {
        let lo = self.read_u32(offset) as u64;
        let hi = self.read_u32(offset + 4) as u64;
        lo | (hi << 32)
    }

    /// Writes two bytes (little-endian) at the given offset.
    fn write_u16(&mut self, offset: u64, val: u16) {
        for (i, b) in val.to_le_bytes().into_iter().enumerate() {
            self.write_u8(offset + i as u64, b);
        }
    }

    /// Writes four bytes (little-endian) at the given offset.
    fn write_u32(&mut self, offset: u64, val: u32) {
        for (i, b) in val.to_le_bytes().into_iter().enumerate() {
            self.write_u8(offset + i as u64, b);
        }
    }

    /// Writes eight bytes (little-endian) at the given offset.
    fn write_u64(&mut self, offset: u64, val: u64) {
        for (i, b) in val.to_le_bytes().into_iter().enumerate() {
            self.write_u8(offset + i as u64, b);
        }
    }

    /// Advances device state; called once per retired instruction.
    fn update(&mut self) {}
}
