//! System interconnect (bus) for memory and MMIO access.
//!
//! This module implements the bus that routes physical address accesses. It provides:
//! 1. **RAM fast path:** Accesses inside guest RAM go straight to [`Memory`].
//! 2. **Device routing:** Other addresses are matched against the sorted device windows,
//!    with a last-device hint.
//! 3. **Access tracking:** Any device access is recorded so the differential tester can
//!    skip the reference for that step.
//! 4. **Update:** Devices are polled once per retired instruction.

use std::fmt;

use tracing::trace;

use crate::common::constants::{RTC_MMIO, SERIAL_MMIO};
use crate::common::data::{AccessType, Width};
use crate::common::error::MemError;
use crate::soc::devices::{Device, Rtc, Serial};
use crate::soc::memory::Memory;

/// System bus connecting the hart to RAM and devices.
pub struct Bus {
    ram: Memory,
    /// Registered MMIO devices, sorted by base address.
    devices: Vec<Box<dyn Device>>,
    last_device_idx: usize,
    device_touched: bool,
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.devices.iter().map(|d| d.name()).collect();
        f.debug_struct("Bus")
            .field("ram", &self.ram)
            .field("devices", &names)
            .finish()
    }
}

impl Bus {
    /// Creates a bus with RAM only.
    pub const fn new(ram: Memory) -> Self {
        Self {
            ram,
            devices: Vec::new(),
            last_device_idx: 0,
            device_touched: false,
        }
    }

    /// Creates a bus with RAM, the serial port and the RTC at their default windows.
    pub fn with_default_devices(ram: Memory) -> Self {
        let mut bus = Self::new(ram);
        bus.add_device(Box::new(Serial::new(SERIAL_MMIO)));
        bus.add_device(Box::new(Rtc::new(RTC_MMIO)));
        bus
    }

    /// Registers a device; devices are kept sorted by base address.
    pub fn add_device(&mut self, dev: Box<dyn Device>) {
        self.devices.push(dev);
        self.devices.sort_by_key(|d| d.address_range().0);
        self.last_device_idx = 0;
    }

    /// Guest RAM.
    #[inline]
    pub const fn ram(&self) -> &Memory {
        &self.ram
    }

    /// Guest RAM, mutably.
    #[inline]
    pub const fn ram_mut(&mut self) -> &mut Memory {
        &mut self.ram
    }

    /// Returns and clears the flag recording that a device was accessed.
    pub const fn take_device_access(&mut self) -> bool {
        let touched = self.device_touched;
        self.device_touched = false;
        touched
    }

    /// Polls every device once.
    pub fn update(&mut self) {
        for dev in &mut self.devices {
            dev.update();
        }
    }

    fn find_device(&mut self, paddr: u64, len: usize) -> Option<(&mut Box<dyn Device>, u64)> {
        let hit = |dev: &dyn Device| {
            let (start, size) = dev.address_range();
            paddr >= start && paddr.saturating_add(len as u64) <= start + size
        };

        let idx = if self
            .devices
            .get(self.last_device_idx)
            .is_some_and(|d| hit(d.as_ref()))
        {
            self.last_device_idx
        } else {
            let i = self.devices.iter().position(|d| hit(d.as_ref()))?;
            self.last_device_idx = i;
            i
        };

        let dev = &mut self.devices[idx];
        let offset = paddr - dev.address_range().0;
        Some((dev, offset))
    }

    /// Reads `width` bytes at `paddr`, zero-extended.
    ///
    /// # Errors
    ///
    /// [`MemError::OutOfBound`] when neither RAM nor a device claims the range.
    pub fn read(&mut self, paddr: u64, width: Width, access: AccessType) -> Result<u64, MemError> {
        if let Some(val) = self.ram.read(paddr, width) {
            return Ok(val);
        }
        let Some((dev, offset)) = self.find_device(paddr, width.bytes()) else {
            return Err(MemError::OutOfBound {
                addr: paddr,
                width,
                access,
            });
        };
        let val = match width {
            Width::Byte => dev.read_u8(offset) as u64,
            Width::Half => dev.read_u16(offset) as u64,
            Width::Word => dev.read_u32(offset) as u64,
            Width::Double => dev.read_u64(offset),
        };
        trace!(target: "mtrace", device = dev.name(), "read {paddr:#x} -> {val:#x}");
        self.device_touched = true;
        Ok(val)
    }

    /// Writes the low `width` bytes of `val` at `paddr`.
    ///
    /// # Errors
    ///
    /// [`MemError::OutOfBound`] when neither RAM nor a device claims the range.
    pub fn write(&mut self, paddr: u64, width: Width, val: u64) -> Result<(), MemError> {
        if self.ram.write(paddr, width, val).is_some() {
            return Ok(());
        }
        let Some((dev, offset)) = self.find_device(paddr, width.bytes()) else {
            return Err(MemError::OutOfBound {
                addr: paddr,
                width,
                access: AccessType::Write,
            });
        };
        match width {
            Width::Byte => dev.write_u8(offset, val as u8),
            Width::Half => dev.write_u16(offset, val as u16),
            Width::Word => dev.write_u32(offset, val as u32),
            Width::Double => dev.write_u64(offset, val),
        }
        trace!(target: "mtrace", device = dev.name(), "write {paddr:#x} <- {val:#x}");
        self.device_touched = true;
        Ok(())
    }
}
