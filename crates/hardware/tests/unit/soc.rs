use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rvsdb_core::common::constants::{RTC_MMIO, SERIAL_MMIO};
use rvsdb_core::common::error::MemError;
use rvsdb_core::common::{AccessType, Width};
use rvsdb_core::soc::devices::{Device, Rtc, Serial};
use rvsdb_core::soc::{Bus, Memory};

const BASE: u64 = 0x8000_0000;

/// A writer whose bytes the test can read back.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn bus_with_serial() -> (Bus, SharedBuf) {
    let sink = SharedBuf::default();
    let mut bus = Bus::new(Memory::new(BASE, 0x1000));
    bus.add_device(Box::new(Serial::with_sink(SERIAL_MMIO, Box::new(sink.clone()))));
    bus.add_device(Box::new(Rtc::new(RTC_MMIO)));
    (bus, sink)
}

#[test]
fn test_memory_bounds() {
    let mut mem = Memory::new(BASE, 0x100);
    assert_eq!(mem.end(), BASE + 0x100);
    assert!(mem.contains(BASE + 0xf8, 8));
    assert!(!mem.contains(BASE + 0xfc, 8));
    assert!(!mem.contains(BASE - 1, 1));
    assert_eq!(mem.write(BASE + 0xfc, Width::Double, 1), None);
    assert_eq!(mem.read(BASE + 0x100, Width::Byte), None);
}

#[test]
fn test_memory_little_endian() {
    let mut mem = Memory::new(BASE, 0x100);
    mem.write(BASE, Width::Double, 0x1122_3344_5566_7788).unwrap();
    assert_eq!(mem.read(BASE, Width::Byte), Some(0x88));
    assert_eq!(mem.read(BASE + 2, Width::Half), Some(0x5566));
    assert_eq!(mem.read(BASE + 4, Width::Word), Some(0x1122_3344));
    assert_eq!(mem.slice(BASE, 2), Some(&[0x88, 0x77][..]));
    mem.fill_zero(BASE, 4).unwrap();
    assert_eq!(mem.read(BASE, Width::Double), Some(0x1122_3344_0000_0000));
}

#[test]
fn test_ram_access_does_not_flag_device() {
    let (mut bus, _) = bus_with_serial();
    bus.write(BASE, Width::Word, 7).unwrap();
    assert_eq!(bus.read(BASE, Width::Word, AccessType::Read), Ok(7));
    assert!(!bus.take_device_access());
}

#[test]
fn test_serial_output() {
    let (mut bus, sink) = bus_with_serial();
    for b in b"hi\n" {
        bus.write(SERIAL_MMIO, Width::Byte, u64::from(*b)).unwrap();
    }
    assert!(bus.take_device_access());
    assert!(!bus.take_device_access());
    assert_eq!(sink.0.borrow().as_slice(), b"hi\n");
}

#[test]
fn test_serial_flushes_on_drop() {
    let (mut bus, sink) = bus_with_serial();
    bus.write(SERIAL_MMIO, Width::Word, u64::from(b'x')).unwrap();
    assert!(sink.0.borrow().is_empty());
    drop(bus);
    assert_eq!(sink.0.borrow().as_slice(), b"x");
}

#[test]
fn test_rtc_latches_on_high_word() {
    let (mut bus, _) = bus_with_serial();
    let hi = bus.read(RTC_MMIO + 4, Width::Word, AccessType::Read).unwrap();
    let lo = bus.read(RTC_MMIO, Width::Word, AccessType::Read).unwrap();
    let first = (hi << 32) | lo;
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = bus.read(RTC_MMIO, Width::Double, AccessType::Read).unwrap();
    assert!(second >= first + 1000);
    assert!(bus.take_device_access());
}

#[test]
fn test_unmapped_access() {
    let (mut bus, _) = bus_with_serial();
    assert_eq!(
        bus.read(0x1000, Width::Word, AccessType::Fetch),
        Err(MemError::OutOfBound {
            addr: 0x1000,
            width: Width::Word,
            access: AccessType::Fetch,
        })
    );
    // Straddling the end of the serial window.
    assert!(bus.write(SERIAL_MMIO + 6, Width::Word, 0).is_err());
}

#[test]
fn test_device_defaults_compose_bytes() {
    let mut rtc = Rtc::new(0);
    assert_eq!(rtc.name(), "rtc");
    assert_eq!(rtc.address_range(), (0, 8));
    assert_eq!(rtc.read_u16(2), 0);
}
