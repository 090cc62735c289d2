//! Memory-Mapped IO Devices.
//!
//! The serial port and real-time clock the guest runtime expects.

/// Real-time clock.
pub mod rtc;

/// Transmit-only serial port.
pub mod serial;

pub use rtc::Rtc;
pub use serial::Serial;

pub use crate::soc::traits::Device;
