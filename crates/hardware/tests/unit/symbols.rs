use std::io::Write;

use pretty_assertions::assert_eq;
use rvsdb_core::common::error::LoadError;
use rvsdb_core::sim::symbols::{Symbol, SymbolTable, UNKNOWN_SYMBOL};

use crate::common::ElfBuilder;

const BASE: u64 = 0x8000_0000;

fn elf() -> Vec<u8> {
    ElfBuilder::new(BASE, &[0; 0x40])
        .func("helper", BASE + 0x20, 0x10)
        .func("_start", BASE, 0x20)
        .func("marker", BASE + 0x30, 0)
        .build()
}

#[test]
fn test_reads_sized_functions() {
    let table = SymbolTable::from_elf(&elf()).unwrap();
    assert_eq!(table.len(), 2);
    let names: Vec<_> = table.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["_start", "helper"]);
}

#[test]
fn test_lookup() {
    let table = SymbolTable::from_elf(&elf()).unwrap();
    assert_eq!(table.lookup(BASE + 0x1c).name, "_start");
    assert_eq!(table.lookup(BASE + 0x20).name, "helper");
    assert_eq!(table.lookup(BASE + 0x2f).name, "helper");
    assert_eq!(table.lookup(BASE + 0x30).name, UNKNOWN_SYMBOL);
    assert_eq!(table.lookup(0).name, UNKNOWN_SYMBOL);
}

#[test]
fn test_function_starts_and_names() {
    let table = SymbolTable::from_elf(&elf()).unwrap();
    assert!(table.is_func_start(BASE + 0x20));
    assert!(!table.is_func_start(BASE + 0x24));
    assert!(!table.is_func_start(BASE + 0x30));
    assert_eq!(table.address_of("helper"), Some(BASE + 0x20));
    assert_eq!(table.address_of("marker"), None);
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&elf()).unwrap();
    let table = SymbolTable::from_file(file.path()).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_rejects_relocatable() {
    let mut data = elf();
    // e_type = ET_REL
    data[16] = 1;
    assert!(matches!(
        SymbolTable::from_elf(&data),
        Err(LoadError::Unsupported(_))
    ));
}

#[test]
fn test_rejects_range_past_address_space() {
    let data = ElfBuilder::new(BASE, &[0; 8])
        .func("hi", u64::MAX - 4, 0x100)
        .build();
    assert!(matches!(
        SymbolTable::from_elf(&data),
        Err(LoadError::Unsupported("symbol range overflows"))
    ));
}

#[test]
fn test_rejects_garbage() {
    assert!(matches!(
        SymbolTable::from_elf(b"not an elf file"),
        Err(LoadError::Elf(_))
    ));
}

#[test]
fn test_empty_table() {
    let table = SymbolTable::default();
    assert!(table.is_empty());
    assert_eq!(table.lookup(BASE).name, UNKNOWN_SYMBOL);
    assert!(!table.is_func_start(0));
}

#[test]
fn test_manual_table_is_sorted() {
    let table = SymbolTable::new(vec![
        Symbol {
            name: "b".into(),
            start: 0x200,
            end: 0x210,
        },
        Symbol {
            name: "a".into(),
            start: 0x100,
            end: 0x110,
        },
    ]);
    let starts: Vec<_> = table.iter().map(|s| s.start).collect();
    assert_eq!(starts, [0x100, 0x200]);
}
