//! RISC-V Instruction Decoder.
//!
//! Splits a 32-bit encoding into a [`Decoded`] record. The immediate is assembled
//! according to the format implied by the opcode (I, S, B, U, J) and sign-extended
//! to 64 bits; R-type and system encodings carry a zero immediate.

use crate::isa::instruction::{Decoded, InstructionBits};
use crate::isa::rv64i::opcodes;

/// Decodes a RISC-V instruction into its component fields.
///
/// # Arguments
///
/// * `inst` - The 32-bit instruction encoding to decode.
pub fn decode(inst: u32) -> Decoded {
    let opcode = inst.opcode();

    let imm = match opcode {
        opcodes::OP_IMM | opcodes::OP_LOAD | opcodes::OP_JALR | opcodes::OP_IMM_32 => {
            imm_i(inst)
        }
        opcodes::OP_STORE => imm_s(inst),
        opcodes::OP_BRANCH => imm_b(inst),
        opcodes::OP_LUI | opcodes::OP_AUIPC => imm_u(inst),
        opcodes::OP_JAL => imm_j(inst),
        _ => 0,
    };

    Decoded {
        raw: inst,
        opcode,
        rd: inst.rd(),
        rs1: inst.rs1(),
        rs2: inst.rs2(),
        funct3: inst.funct3(),
        funct7: inst.funct7(),
        imm,
    }
}

/// `imm[11:0] | rs1 | funct3 | rd | opcode`
const fn imm_i(inst: u32) -> i64 {
    ((inst as i32) >> 20) as i64
}

/// `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`
const fn imm_s(inst: u32) -> i64 {
    let v = (((inst >> 25) & 0x7F) << 5) | ((inst >> 7) & 0x1F);
    sign_extend(v, 12)
}

/// `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`
const fn imm_b(inst: u32) -> i64 {
    let v = (((inst >> 31) & 1) << 12)
        | (((inst >> 7) & 1) << 11)
        | (((inst >> 25) & 0x3F) << 5)
        | (((inst >> 8) & 0xF) << 1);
    sign_extend(v, 13)
}

/// `imm[31:12] | rd | opcode`
const fn imm_u(inst: u32) -> i64 {
    ((inst & 0xFFFF_F000) as i32) as i64
}

/// `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`
const fn imm_j(inst: u32) -> i64 {
    let v = (((inst >> 31) & 1) << 20)
        | (((inst >> 12) & 0xFF) << 12)
        | (((inst >> 20) & 1) << 11)
        | (((inst >> 21) & 0x3FF) << 1);
    sign_extend(v, 21)
}

/// Sign-extends the low `bits` bits of `val`.
const fn sign_extend(val: u32, bits: u32) -> i64 {
    let shift = 32 - bits;
    (((val << shift) as i32) >> shift) as i64
}
