use std::io::Write;

use pretty_assertions::assert_eq;
use rvsdb_core::common::Width;
use rvsdb_core::common::error::LoadError;
use rvsdb_core::sim::loader::{
    BUILTIN_IMAGE, BUILTIN_IMAGE_SIZE, Image, load_builtin, load_bytes, load_file,
};
use rvsdb_core::soc::Memory;

use crate::common::ElfBuilder;
use crate::common::harness::words_to_bytes;

const BASE: u64 = 0x8000_0000;

fn ram() -> Memory {
    Memory::new(BASE, 0x1000)
}

#[test]
fn test_builtin_image() {
    let mut mem = ram();
    let image = load_builtin(&mut mem).unwrap();
    assert_eq!(
        image,
        Image {
            entry: BASE,
            start: BASE,
            size: BUILTIN_IMAGE_SIZE,
        }
    );
    for (i, word) in BUILTIN_IMAGE.iter().enumerate() {
        let addr = BASE + 4 * i as u64;
        assert_eq!(mem.read(addr, Width::Word), Some(u64::from(*word)));
    }
}

#[test]
fn test_builtin_size_clamped_to_ram() {
    let mut mem = Memory::new(BASE, 64);
    assert_eq!(load_builtin(&mut mem).unwrap().size, 64);
}

#[test]
fn test_raw_image_at_ram_base() {
    let mut mem = ram();
    let image = load_bytes(&mut mem, &[0x13, 0x05, 0xa0, 0x00]).unwrap();
    assert_eq!(
        image,
        Image {
            entry: BASE,
            start: BASE,
            size: 4,
        }
    );
    assert_eq!(mem.read(BASE, Width::Word), Some(0x00a0_0513));
}

#[test]
fn test_raw_image_too_large() {
    let mut mem = ram();
    let err = load_bytes(&mut mem, &vec![0u8; 0x1001]).unwrap_err();
    assert!(matches!(
        err,
        LoadError::OutOfMemory { addr: BASE, end } if end == BASE + 0x1001
    ));
}

#[test]
fn test_elf_segment_and_bss() {
    let mut mem = ram();
    mem.load(BASE + 0x10, &[0xff; 0x10]).unwrap();

    let code = words_to_bytes(&BUILTIN_IMAGE[..4]);
    let elf = ElfBuilder::new(BASE, &code).memsz(0x20).build();
    let image = load_bytes(&mut mem, &elf).unwrap();

    assert_eq!(
        image,
        Image {
            entry: BASE,
            start: BASE,
            size: 0x20,
        }
    );
    assert_eq!(mem.read(BASE + 0xc, Width::Word), Some(0x0010_0073));
    assert_eq!(mem.read(BASE + 0x10, Width::Double), Some(0));
    assert_eq!(mem.read(BASE + 0x18, Width::Double), Some(0));
}

#[test]
fn test_elf_from_file() {
    let code = words_to_bytes(&BUILTIN_IMAGE[..4]);
    let elf = ElfBuilder::new(BASE + 0x100, &code).build();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&elf).unwrap();

    let mut mem = ram();
    let image = load_file(&mut mem, file.path()).unwrap();
    assert_eq!(image.entry, BASE + 0x100);
    assert_eq!(image.size, 16);
    assert_eq!(mem.read(BASE + 0x100, Width::Word), Some(0x0000_0297));
}

#[test]
fn test_elf_wrong_machine() {
    let elf = ElfBuilder::new(BASE, &[0; 4]).machine(62).build();
    let err = load_bytes(&mut ram(), &elf).unwrap_err();
    assert!(matches!(err, LoadError::Unsupported("not a RISC-V file")));
}

#[test]
fn test_elf_not_executable() {
    let mut elf = ElfBuilder::new(BASE, &[0; 4]).build();
    // e_type = ET_REL
    elf[16] = 1;
    let err = load_bytes(&mut ram(), &elf).unwrap_err();
    assert!(matches!(err, LoadError::Unsupported("not an executable")));
}

#[test]
fn test_elf_segment_outside_ram() {
    let elf = ElfBuilder::new(0x9000_0000, &[0; 4]).build();
    let err = load_bytes(&mut ram(), &elf).unwrap_err();
    assert!(matches!(err, LoadError::OutOfMemory { addr: 0x9000_0000, .. }));
}

#[test]
fn test_truncated_elf() {
    let err = load_bytes(&mut ram(), b"\x7fELF\x02\x01").unwrap_err();
    assert!(matches!(err, LoadError::Elf(_)));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.bin");
    let err = load_file(&mut ram(), &path).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}
