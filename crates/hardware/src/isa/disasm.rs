//! Instruction Disassembler for RV64IM + Zicsr.
//!
//! Renders a decoded instruction as assembly text for the instruction trace, the
//! ring buffer post-mortem, and invalid-instruction diagnostics. Branch and jump
//! targets are printed as absolute addresses; CSR operands by name where known.
//!
//! ```
//! use rvsdb_core::isa::disasm::disassemble;
//! assert_eq!(disassemble(0x8000_0000, 0x00A0_0513), "addi a0, zero, 10");
//! ```

use crate::core::arch::csr::Csrs;
use crate::isa::abi::name as xreg;
use crate::isa::decode::decode;
use crate::isa::instruction::Decoded;
use crate::isa::privileged::opcodes as sys_op;
use crate::isa::rv64i::{funct3 as i_f3, funct7 as i_f7, opcodes as i_op};
use crate::isa::rv64m::{M_EXTENSION, funct3 as m_f3};

/// Disassembles the instruction `inst` located at `pc`.
///
/// Unrecognised encodings render as `unknown (0x........)`.
pub fn disassemble(pc: u64, inst: u32) -> String {
    let d = decode(inst);
    let (rd, rs1, rs2, imm) = (xreg(d.rd), xreg(d.rs1), xreg(d.rs2), d.imm);

    match d.opcode {
        i_op::OP_REG => op_reg(&d, ""),
        i_op::OP_REG_32 => op_reg(&d, "w"),
        i_op::OP_IMM => op_imm(&d, ""),
        i_op::OP_IMM_32 => op_imm(&d, "w"),

        i_op::OP_LOAD => {
            let mn = match d.funct3 {
                i_f3::LB => "lb",
                i_f3::LH => "lh",
                i_f3::LW => "lw",
                i_f3::LD => "ld",
                i_f3::LBU => "lbu",
                i_f3::LHU => "lhu",
                i_f3::LWU => "lwu",
                _ => return unknown(inst),
            };
            format!("{mn} {rd}, {imm}({rs1})")
        }
        i_op::OP_STORE => {
            let mn = match d.funct3 {
                i_f3::SB => "sb",
                i_f3::SH => "sh",
                i_f3::SW => "sw",
                i_f3::SD => "sd",
                _ => return unknown(inst),
            };
            format!("{mn} {rs2}, {imm}({rs1})")
        }
        i_op::OP_BRANCH => {
            let mn = match d.funct3 {
                i_f3::BEQ => "beq",
                i_f3::BNE => "bne",
                i_f3::BLT => "blt",
                i_f3::BGE => "bge",
                i_f3::BLTU => "bltu",
                i_f3::BGEU => "bgeu",
                _ => return unknown(inst),
            };
            let target = pc.wrapping_add(imm as u64);
            format!("{mn} {rs1}, {rs2}, {target:#x}")
        }

        i_op::OP_LUI => format!("lui {rd}, {:#x}", (imm >> 12) & 0xF_FFFF),
        i_op::OP_AUIPC => format!("auipc {rd}, {:#x}", (imm >> 12) & 0xF_FFFF),
        i_op::OP_JAL => format!("jal {rd}, {:#x}", pc.wrapping_add(imm as u64)),
        i_op::OP_JALR => format!("jalr {rd}, {imm}({rs1})"),
        i_op::OP_MISC_MEM => "fence".to_string(),
        sys_op::OP_SYSTEM => system(&d),

        _ => unknown(inst),
    }
}

fn unknown(inst: u32) -> String {
    format!("unknown ({inst:#010x})")
}

fn op_reg(d: &Decoded, suffix: &str) -> String {
    let mn = if d.funct7 == M_EXTENSION {
        match d.funct3 {
            m_f3::MUL => "mul",
            m_f3::MULH => "mulh",
            m_f3::MULHSU => "mulhsu",
            m_f3::MULHU => "mulhu",
            m_f3::DIV => "div",
            m_f3::DIVU => "divu",
            m_f3::REM => "rem",
            _ => "remu",
        }
    } else {
        match (d.funct3, d.funct7) {
            (i_f3::ADD_SUB, i_f7::DEFAULT) => "add",
            (i_f3::ADD_SUB, i_f7::ALT) => "sub",
            (i_f3::SLL, _) => "sll",
            (i_f3::SLT, _) => "slt",
            (i_f3::SLTU, _) => "sltu",
            (i_f3::XOR, _) => "xor",
            (i_f3::SRL_SRA, i_f7::DEFAULT) => "srl",
            (i_f3::SRL_SRA, i_f7::ALT) => "sra",
            (i_f3::OR, _) => "or",
            (i_f3::AND, _) => "and",
            _ => return unknown(d.raw),
        }
    };
    format!(
        "{mn}{suffix} {}, {}, {}",
        xreg(d.rd),
        xreg(d.rs1),
        xreg(d.rs2)
    )
}

fn op_imm(d: &Decoded, suffix: &str) -> String {
    let (rd, rs1) = (xreg(d.rd), xreg(d.rs1));
    let mn = match d.funct3 {
        i_f3::ADD_SUB => "addi",
        i_f3::SLT => "slti",
        i_f3::SLTU => "sltiu",
        i_f3::XOR => "xori",
        i_f3::OR => "ori",
        i_f3::AND => "andi",
        i_f3::SLL => return format!("slli{suffix} {rd}, {rs1}, {}", d.shamt()),
        _ => {
            let mn = if (d.imm >> 10) & 1 != 0 { "srai" } else { "srli" };
            return format!("{mn}{suffix} {rd}, {rs1}, {}", d.shamt());
        }
    };
    format!("{mn}{suffix} {rd}, {rs1}, {}", d.imm)
}

fn system(d: &Decoded) -> String {
    match d.raw {
        sys_op::ECALL => return "ecall".to_string(),
        sys_op::EBREAK => return "ebreak".to_string(),
        sys_op::MRET => return "mret".to_string(),
        _ => {}
    }

    let csr = d.csr();
    let csr = Csrs::name(csr).map_or_else(|| format!("{csr:#05x}"), str::to_string);
    let rd = xreg(d.rd);
    match d.funct3 {
        sys_op::CSRRW => format!("csrrw {rd}, {csr}, {}", xreg(d.rs1)),
        sys_op::CSRRS => format!("csrrs {rd}, {csr}, {}", xreg(d.rs1)),
        sys_op::CSRRC => format!("csrrc {rd}, {csr}, {}", xreg(d.rs1)),
        sys_op::CSRRWI => format!("csrrwi {rd}, {csr}, {}", d.rs1),
        sys_op::CSRRSI => format!("csrrsi {rd}, {csr}, {}", d.rs1),
        sys_op::CSRRCI => format!("csrrci {rd}, {csr}, {}", d.rs1),
        _ => unknown(d.raw),
    }
}
