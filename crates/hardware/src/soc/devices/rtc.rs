//! Real-Time Clock (RTC).
//!
//! Reports microseconds elapsed since the device was created as a 64-bit counter
//! split over two 32-bit words. Reading the high word latches the current time, so a
//! guest that reads high then low sees a consistent pair.
//!
//! # Memory Map
//!
//! * `0x00`: Time (low 32 bits of the latched value)
//! * `0x04`: Time (high 32 bits; reading latches)

use std::time::Instant;

use crate::soc::traits::Device;

/// RTC device structure.
#[derive(Debug)]
pub struct Rtc {
    /// Base physical address of the device.
    base_addr: u64,
    /// Time origin.
    boot: Instant,
    /// Value captured by the last latching read.
    latched: u64,
}

impl Rtc {
    /// Creates an RTC at `base_addr` whose origin is now.
    pub fn new(base_addr: u64) -> Self {
        Self {
            base_addr,
            boot: Instant::now(),
            latched: 0,
        }
    }

    fn now_us(&self) -> u64 {
        self.boot.elapsed().as_micros() as u64
    }
}

impl Device for Rtc {
    fn name(&self) -> &str {
        "rtc"
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, 8)
    }

    fn read_u8(&mut self, offset: u64) -> u8 {
        (self.latched >> ((offset & 7) * 8)) as u8
    }

    fn write_u8(&mut self, _offset: u64, _val: u8) {}

    fn read_u32(&mut self, offset: u64) -> u32 {
        match offset {
            0x00 => self.latched as u32,
            0x04 => {
                self.latched = self.now_us();
                (self.latched >> 32) as u32
            }
            _ => 0,
        }
    }

    fn read_u64(&mut self, offset: u64) -> u64 {
        if offset != 0 {
            return 0;
        }
        self.latched = self.now_us();
        self.latched
    }
}
