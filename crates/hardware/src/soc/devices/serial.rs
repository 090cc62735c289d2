//! Serial Port.
//!
//! A transmit-only serial port: every byte the guest stores to the data register is
//! forwarded to the host sink (stdout by default). Output is buffered and flushed on
//! newline, when the buffer fills, or when the device is dropped.
//!
//! # Memory Map
//!
//! * `0x00`: Data register (write a byte to transmit; reads return 0).

use std::io::{self, Write};

use tracing::warn;

use crate::soc::traits::Device;

/// Size of the MMIO window in bytes.
const SERIAL_WINDOW: u64 = 8;

/// Threshold for flushing the transmit buffer to the sink.
const TX_BUFFER_FLUSH_THRESHOLD: usize = 4096;

/// Serial port device.
pub struct Serial {
    /// Base physical address of the device.
    base_addr: u64,
    /// Bytes transmitted since the last flush.
    tx_buffer: Vec<u8>,
    /// Host sink for transmitted bytes.
    out: Box<dyn Write>,
}

impl std::fmt::Debug for Serial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Serial")
            .field("base_addr", &format_args!("{:#x}", self.base_addr))
            .field("pending", &self.tx_buffer.len())
            .finish_non_exhaustive()
    }
}

impl Serial {
    /// Creates a serial port at `base_addr` that transmits to host stdout.
    pub fn new(base_addr: u64) -> Self {
        Self::with_sink(base_addr, Box::new(io::stdout()))
    }

    /// Creates a serial port at `base_addr` that transmits to `out`.
    pub fn with_sink(base_addr: u64, out: Box<dyn Write>) -> Self {
        Self {
            base_addr,
            tx_buffer: Vec::with_capacity(TX_BUFFER_FLUSH_THRESHOLD),
            out,
        }
    }

    fn flush(&mut self) {
        if self.tx_buffer.is_empty() {
            return;
        }
        let res = self
            .out
            .write_all(&self.tx_buffer)
            .and_then(|()| self.out.flush());
        if let Err(e) = res {
            warn!(device = "serial", "dropping {} bytes: {e}", self.tx_buffer.len());
        }
        self.tx_buffer.clear();
    }
}

impl Device for Serial {
    fn name(&self) -> &str {
        "serial"
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, SERIAL_WINDOW)
    }

    fn read_u8(&mut self, _offset: u64) -> u8 {
        0
    }

    fn write_u8(&mut self, offset: u64, val: u8) {
        if offset != 0 {
            return;
        }
        self.tx_buffer.push(val);
        if val == b'\n' || self.tx_buffer.len() >= TX_BUFFER_FLUSH_THRESHOLD {
            self.flush();
        }
    }

    /// Only the low byte of a wider store is transmitted.
    fn write_u32(&mut self, offset: u64, val: u32) {
        self.write_u8(offset, val as u8);
    }

    fn write_u64(&mut self, offset: u64, val: u64) {
        self.write_u8(offset, val as u8);
    }
}

impl Drop for Serial {
    fn drop(&mut self) {
        self.flush();
    }
}
