//! Memory Access Helpers.
//!
//! This module provides the interface between the CPU and the memory subsystem.
//! Addresses are physical (the hart runs in machine mode without translation); any
//! access that neither RAM nor a device claims becomes an [`ExecError::Mem`] naming
//! the PC of the faulting instruction.

use super::Cpu;
use crate::common::data::{AccessType, Width};
use crate::common::error::ExecError;
use crate::isa::instruction::Decoded;
use crate::isa::rv64i::funct3 as i_f3;
use crate::soc::Bus;

impl Cpu {
    /// Fetches the 32-bit instruction word at `pc`.
    pub(super) fn fetch(bus: &mut Bus, pc: u64) -> Result<u32, ExecError> {
        bus.read(pc, Width::Word, AccessType::Fetch)
            .map(|w| w as u32)
            .map_err(|source| ExecError::Mem { pc, source })
    }

    /// Executes a load (`LB`..`LWU`) and writes the extended value to `rd`.
    pub(super) fn exec_load(&mut self, bus: &mut Bus, pc: u64, d: &Decoded) -> Result<(), ExecError> {
        let (width, signed) = match d.funct3 {
            i_f3::LB => (Width::Byte, true),
            i_f3::LH => (Width::Half, true),
            i_f3::LW => (Width::Word, true),
            i_f3::LD => (Width::Double, false),
            i_f3::LBU => (Width::Byte, false),
            i_f3::LHU => (Width::Half, false),
            i_f3::LWU => (Width::Word, false),
            _ => return Err(ExecError::InvalidInstruction { pc, inst: d.raw }),
        };
        let addr = self.gpr.read(d.rs1).wrapping_add(d.imm as u64);
        let raw = bus
            .read(addr, width, AccessType::Read)
            .map_err(|source| ExecError::Mem { pc, source })?;
        let val = if signed {
            let shift = 64 - width.bytes() as u32 * 8;
            (((raw << shift) as i64) >> shift) as u64
        } else {
            raw
        };
        self.gpr.write(d.rd, val);
        Ok(())
    }

    /// Executes a store (`SB`..`SD`).
    pub(super) fn exec_store(&mut self, bus: &mut Bus, pc: u64, d: &Decoded) -> Result<(), ExecError> {
        let width = match d.funct3 {
            i_f3::SB => Width::Byte,
            i_f3::SH => Width::Half,
            i_f3::SW => Width::Word,
            i_f3::SD => Width::Double,
            _ => return Err(ExecError::InvalidInstruction { pc, inst: d.raw }),
        };
        let addr = self.gpr.read(d.rs1).wrapping_add(d.imm as u64);
        let val = self.gpr.read(d.rs2) & width.mask();
        bus.write(addr, width, val)
            .map_err(|source| ExecError::Mem { pc, source })
    }
}
