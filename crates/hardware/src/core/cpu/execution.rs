//! Main Execution Step.
//!
//! This module implements the execution of a single instruction. It performs the following:
//! 1. **Fetch:** Reads the 32-bit instruction word at `pc` through the bus.
//! 2. **Decode:** Splits the word into fields and a sign-extended immediate.
//! 3. **Execute:** Applies RV64I, RV64M, Zicsr, `ecall`, `ebreak` and `mret` semantics.
//! 4. **Retire:** Commits `dnpc` to `pc`.

use super::{Cpu, Decode, Retire};
use crate::common::constants::INSTRUCTION_SIZE_32;
use crate::common::error::ExecError;
use crate::core::alu::AluOp;
use crate::isa::abi;
use crate::isa::decode::decode;
use crate::isa::privileged::opcodes as sys_op;
use crate::isa::rv64i::{funct3 as i_f3, opcodes as i_op};
use crate::soc::Bus;

impl Cpu {
    /// Executes the instruction at `s.pc` and retires it.
    ///
    /// On success `s.inst`, `s.snpc` and `s.dnpc` describe the retired instruction and
    /// `self.pc` equals `s.dnpc`. On failure no architectural state is committed beyond
    /// what the faulting instruction had already written (none, for every supported
    /// instruction) and `self.pc` is unchanged.
    ///
    /// # Errors
    ///
    /// * [`ExecError::InvalidInstruction`] for encodings outside RV64IM + Zicsr.
    /// * [`ExecError::Mem`] for fetches, loads or stores outside RAM and devices.
    /// * [`ExecError::UnsupportedTrap`] for an `ecall` the trap glue cannot service.
    pub fn exec_once(&mut self, bus: &mut Bus, s: &mut Decode) -> Result<Retire, ExecError> {
        let pc = s.pc;
        s.inst = Self::fetch(bus, pc)?;
        s.snpc = pc.wrapping_add(INSTRUCTION_SIZE_32);
        s.dnpc = s.snpc;

        let d = decode(s.inst);
        let invalid = || ExecError::InvalidInstruction { pc, inst: d.raw };
        let rs1 = self.gpr.read(d.rs1);
        let rs2 = self.gpr.read(d.rs2);
        let imm = d.imm as u64;
        let mut retire = Retire::Next;

        match d.opcode {
            i_op::OP_LUI => self.gpr.write(d.rd, imm),
            i_op::OP_AUIPC => self.gpr.write(d.rd, pc.wrapping_add(imm)),

            i_op::OP_JAL => {
                self.gpr.write(d.rd, s.snpc);
                s.dnpc = pc.wrapping_add(imm);
            }
            i_op::OP_JALR => {
                if d.funct3 != 0 {
                    return Err(invalid());
                }
                s.dnpc = rs1.wrapping_add(imm) & !1;
                self.gpr.write(d.rd, s.snpc);
            }

            i_op::OP_BRANCH => {
                let taken = match d.funct3 {
                    i_f3::BEQ => rs1 == rs2,
                    i_f3::BNE => rs1 != rs2,
                    i_f3::BLT => (rs1 as i64) < (rs2 as i64),
                    i_f3::BGE => (rs1 as i64) >= (rs2 as i64),
                    i_f3::BLTU => rs1 < rs2,
                    i_f3::BGEU => rs1 >= rs2,
                    _ => return Err(invalid()),
                };
                if taken {
                    s.dnpc = pc.wrapping_add(imm);
                }
            }

            i_op::OP_LOAD => self.exec_load(bus, pc, &d)?,
            i_op::OP_STORE => self.exec_store(bus, pc, &d)?,

            i_op::OP_IMM | i_op::OP_IMM_32 => {
                let is32 = d.opcode == i_op::OP_IMM_32;
                let op = AluOp::from_imm(d.funct3, d.imm, is32).ok_or_else(invalid)?;
                self.gpr.write(d.rd, op.execute(rs1, imm, is32));
            }
            i_op::OP_REG | i_op::OP_REG_32 => {
                let is32 = d.opcode == i_op::OP_REG_32;
                let op = AluOp::from_reg(d.funct3, d.funct7, is32).ok_or_else(invalid)?;
                self.gpr.write(d.rd, op.execute(rs1, rs2, is32));
            }

            // FENCE and FENCE.I order nothing on a single in-order hart.
            i_op::OP_MISC_MEM => {}

            sys_op::OP_SYSTEM => match (d.funct3, d.raw) {
                (sys_op::PRIV, sys_op::ECALL) => s.dnpc = self.exec_ecall(pc)?,
                (sys_op::PRIV, sys_op::EBREAK) => {
                    retire = Retire::Halt(self.gpr.read(abi::REG_A0));
                }
                (sys_op::PRIV, sys_op::MRET) => s.dnpc = self.exec_mret(),
                (sys_op::PRIV, _) => return Err(invalid()),
                _ => self.exec_csr(pc, &d)?,
            },

            _ => return Err(invalid()),
        }

        self.pc = s.dnpc;
        Ok(retire)
    }
}
