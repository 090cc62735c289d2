//! Guest image loading.
//!
//! This module places a program into guest RAM and reports where it landed. It handles:
//! 1. **Raw images:** Flat binaries copied verbatim to the start of RAM.
//! 2. **ELF executables:** 64-bit little-endian RISC-V `ET_EXEC` files; every `PT_LOAD`
//!    segment is copied to its address and its `memsz - filesz` tail is zeroed.
//! 3. **Built-in image:** A five-word program used when no image is given.

use std::fs;
use std::path::Path;

use object::elf;
use object::read::elf::{ElfFile64, FileHeader, ProgramHeader};
use object::{Endianness, Object};
use tracing::info;

use crate::common::error::LoadError;
use crate::soc::Memory;

/// Program run when no image is given: store a zero byte, load it back into `a0` and halt.
pub const BUILTIN_IMAGE: [u32; 5] = [
    0x0000_0297, // auipc t0, 0
    0x0002_8823, // sb    zero, 16(t0)
    0x0102_c503, // lbu   a0, 16(t0)
    0x0010_0073, // ebreak
    0xdead_beef, // data
];

/// Size reported for the built-in image; the reference receives this many bytes.
pub const BUILTIN_IMAGE_SIZE: u64 = 4096;

/// Where a loaded program lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Image {
    /// Initial program counter.
    pub entry: u64,
    /// Lowest address written by the loader.
    pub start: u64,
    /// Number of bytes from `start` covered by the image.
    pub size: u64,
}

/// Copies the built-in program to the start of `mem`.
///
/// # Errors
///
/// [`LoadError::OutOfMemory`] if RAM is smaller than the built-in image.
pub fn load_builtin(mem: &mut Memory) -> Result<Image, LoadError> {
    let bytes: Vec<u8> = BUILTIN_IMAGE.iter().flat_map(|w| w.to_le_bytes()).collect();
    let base = mem.base();
    mem.load(base, &bytes).ok_or(LoadError::OutOfMemory {
        addr: base,
        end: base + bytes.len() as u64,
    })?;
    let size = BUILTIN_IMAGE_SIZE.min(mem.size());
    Ok(Image {
        entry: base,
        start: base,
        size,
    })
}

/// Reads `path` and loads it as an ELF executable or a raw image.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read, otherwise as [`load_bytes`].
pub fn load_file(mem: &mut Memory, path: &Path) -> Result<Image, LoadError> {
    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = load_bytes(mem, &data)?;
    info!(
        "the image is {}, size = {}, entry = {:#x}",
        path.display(),
        data.len(),
        image.entry
    );
    Ok(image)
}

/// Loads `data` into `mem`; data starting with the ELF magic is parsed as ELF.
///
/// # Errors
///
/// * [`LoadError::Elf`] or [`LoadError::Unsupported`] for ELF files that cannot be run.
/// * [`LoadError::OutOfMemory`] for anything that does not fit in RAM.
pub fn load_bytes(mem: &mut Memory, data: &[u8]) -> Result<Image, LoadError> {
    if data.starts_with(&elf::ELFMAG) {
        load_elf(mem, data)
    } else {
        load_raw(mem, data)
    }
}

fn load_raw(mem: &mut Memory, data: &[u8]) -> Result<Image, LoadError> {
    let base = mem.base();
    let size = data.len() as u64;
    mem.load(base, data).ok_or(LoadError::OutOfMemory {
        addr: base,
        end: base.saturating_add(size),
    })?;
    Ok(Image {
        entry: base,
        start: base,
        size,
    })
}

fn load_elf(mem: &mut Memory, data: &[u8]) -> Result<Image, LoadError> {
    let file = ElfFile64::<Endianness>::parse(data)?;
    if !file.is_little_endian() {
        return Err(LoadError::Unsupported("not little-endian"));
    }
    let endian = file.endian();
    let header = file.elf_header();
    if header.e_type(endian) != elf::ET_EXEC {
        return Err(LoadError::Unsupported("not an executable"));
    }
    if header.e_machine(endian) != elf::EM_RISCV {
        return Err(LoadError::Unsupported("not a RISC-V file"));
    }

    let mut lo = u64::MAX;
    let mut hi = 0;
    for phdr in file.elf_program_headers() {
        if phdr.p_type(endian) != elf::PT_LOAD {
            continue;
        }
        let addr = phdr.p_vaddr(endian);
        let filesz = phdr.p_filesz(endian);
        let memsz = phdr.p_memsz(endian);
        let end = addr.saturating_add(memsz);
        let bytes = phdr
            .data(endian, data)
            .map_err(|()| LoadError::Unsupported("segment lies outside the file"))?;
        if filesz > memsz || !mem.contains(addr, memsz as usize) {
            return Err(LoadError::OutOfMemory { addr, end });
        }

        mem.load(addr, bytes)
            .ok_or(LoadError::OutOfMemory { addr, end })?;
        mem.fill_zero(addr + filesz, (memsz - filesz) as usize)
            .ok_or(LoadError::OutOfMemory { addr, end })?;

        lo = lo.min(addr);
        hi = hi.max(end);
    }

    if lo > hi {
        return Err(LoadError::Unsupported("no loadable segments"));
    }
    Ok(Image {
        entry: header.e_entry(endian),
        start: lo,
        size: hi - lo,
    })
}
