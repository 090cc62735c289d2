//! CSR Access Logic.
//!
//! Executes the six Zicsr instructions. The old value is written to `rd` and the new
//! value is formed from `rs1` (or the 5-bit immediate in the `rs1` field). `CSRRS` /
//! `CSRRC` with a zero source do not write the CSR. Unknown CSR addresses make the
//! instruction invalid.

use super::Cpu;
use crate::common::error::ExecError;
use crate::isa::instruction::Decoded;
use crate::isa::privileged::opcodes as sys_op;

impl Cpu {
    /// Reads a CSR; unknown addresses read as `None`.
    pub fn csr_read(&self, addr: u32) -> Option<u64> {
        self.csrs.read(addr)
    }

    /// Writes a CSR; returns `false` for unknown addresses.
    pub fn csr_write(&mut self, addr: u32, val: u64) -> bool {
        self.csrs.write(addr, val)
    }

    pub(super) fn exec_csr(&mut self, pc: u64, d: &Decoded) -> Result<(), ExecError> {
        let invalid = ExecError::InvalidInstruction { pc, inst: d.raw };
        let addr = d.csr();
        let old = self.csr_read(addr).ok_or_else(|| invalid.clone())?;

        let src = match d.funct3 {
            sys_op::CSRRW | sys_op::CSRRS | sys_op::CSRRC => self.gpr.read(d.rs1),
            sys_op::CSRRWI | sys_op::CSRRSI | sys_op::CSRRCI => d.rs1 as u64,
            _ => return Err(invalid),
        };

        let new = match d.funct3 {
            sys_op::CSRRW | sys_op::CSRRWI => Some(src),
            sys_op::CSRRS | sys_op::CSRRSI => (d.rs1 != 0).then_some(old | src),
            _ => (d.rs1 != 0).then_some(old & !src),
        };

        if let Some(val) = new {
            let _ = self.csr_write(addr, val);
        }
        self.gpr.write(d.rd, old);
        Ok(())
    }
}
