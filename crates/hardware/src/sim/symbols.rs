//! Function symbol table.
//!
//! Built from the `STT_FUNC` entries of an ELF symbol table that have a non-zero size.
//! Entries are kept sorted by start address and terminated by a `???` sentinel with an
//! empty range, so a lookup miss still yields a printable name.

use std::fs;
use std::path::Path;

use object::{Object, ObjectSymbol, SymbolKind};
use tracing::info;

use crate::common::error::LoadError;

/// Name reported for addresses outside every known function.
pub const UNKNOWN_SYMBOL: &str = "???";

/// One function: `[start, end)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol name.
    pub name: String,
    /// First address of the function.
    pub start: u64,
    /// One past the last address of the function.
    pub end: u64,
}

impl Symbol {
    /// Whether `addr` falls inside the function.
    pub const fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }
}

/// Sorted function symbols with a trailing sentinel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SymbolTable {
    /// Builds a table from arbitrary symbols.
    pub fn new(mut symbols: Vec<Symbol>) -> Self {
        symbols.sort_by_key(|s| s.start);
        symbols.push(Symbol {
            name: UNKNOWN_SYMBOL.to_owned(),
            start: 0,
            end: 0,
        });
        Self { symbols }
    }

    /// Reads function symbols from the ELF file at `path`.
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] if the file cannot be read, otherwise as [`Self::from_elf`].
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let data = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_elf(&data)?;
        info!("loaded {} function symbols from {}", table.len(), path.display());
        Ok(table)
    }

    /// Reads function symbols from an in-memory ELF file.
    ///
    /// # Errors
    ///
    /// [`LoadError::Elf`] if the file cannot be parsed, [`LoadError::Unsupported`] if
    /// it is not an executable or a function's range runs past the address space.
    pub fn from_elf(data: &[u8]) -> Result<Self, LoadError> {
        let file = object::File::parse(data)?;
        if file.kind() != object::ObjectKind::Executable {
            return Err(LoadError::Unsupported("not an executable"));
        }
        let symbols = file
            .symbols()
            .filter(|sym| sym.kind() == SymbolKind::Text && sym.size() != 0)
            .filter_map(|sym| sym.name().ok().map(|name| (name, sym.address(), sym.size())))
            .map(|(name, start, size)| {
                let end = start
                    .checked_add(size)
                    .ok_or(LoadError::Unsupported("symbol range overflows"))?;
                Ok(Symbol {
                    name: name.to_owned(),
                    start,
                    end,
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;
        Ok(Self::new(symbols))
    }

    /// Number of real symbols (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.symbols.len() - 1
    }

    /// Whether the table holds no real symbols.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the real symbols in address order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols[..self.len()].iter()
    }

    /// The function containing `addr`, or the sentinel.
    pub fn lookup(&self, addr: u64) -> &Symbol {
        let last = self.symbols.len() - 1;
        self.symbols[..last]
            .iter()
            .find(|s| s.contains(addr))
            .unwrap_or(&self.symbols[last])
    }

    /// Whether some function starts exactly at `addr`.
    pub fn is_func_start(&self, addr: u64) -> bool {
        self.iter().any(|s| s.start == addr)
    }

    /// Start address of the function called `name`.
    pub fn address_of(&self, name: &str) -> Option<u64> {
        self.iter().find(|s| s.name == name).map(|s| s.start)
    }
}
