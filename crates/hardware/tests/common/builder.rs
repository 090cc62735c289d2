use rvsdb_core::isa::privileged::opcodes::{CSRRS, CSRRW, OP_SYSTEM};
use rvsdb_core::isa::rv64i::opcodes::*;
use rvsdb_core::isa::rv64m::M_EXTENSION;

pub struct InstructionBuilder {
    opcode: u32,
    rd: u32,
    funct3: u32,
    rs1: u32,
    rs2: u32,
    funct7: u32,
    imm: i32,
}

impl Default for InstructionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionBuilder {
    pub fn new() -> Self {
        Self {
            opcode: 0,
            rd: 0,
            funct3: 0,
            rs1: 0,
            rs2: 0,
            funct7: 0,
            imm: 0,
        }
    }

    fn r(mut self, opcode: u32, funct3: u32, funct7: u32, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.opcode = opcode;
        self.funct3 = funct3;
        self.funct7 = funct7;
        self.rd = rd;
        self.rs1 = rs1;
        self.rs2 = rs2;
        self
    }

    fn i(mut self, opcode: u32, funct3: u32, rd: u32, rs1: u32, imm: i32) -> Self {
        self.opcode = opcode;
        self.funct3 = funct3;
        self.rd = rd;
        self.rs1 = rs1;
        self.imm = imm;
        self
    }

    fn s(mut self, opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.opcode = opcode;
        self.funct3 = funct3;
        self.rs1 = rs1;
        self.rs2 = rs2;
        self.imm = imm;
        self
    }

    // --- Helpers for Common Instructions ---

    pub fn add(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(OP_REG, 0b000, 0b0000000, rd, rs1, rs2)
    }

    pub fn sub(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(OP_REG, 0b000, 0b0100000, rd, rs1, rs2)
    }

    pub fn mul(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(OP_REG, 0b000, M_EXTENSION, rd, rs1, rs2)
    }

    pub fn div(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(OP_REG, 0b100, M_EXTENSION, rd, rs1, rs2)
    }

    pub fn addi(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, 0b000, rd, rs1, imm)
    }

    pub fn addiw(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM_32, 0b000, rd, rs1, imm)
    }

    pub fn ld(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, 0b011, rd, rs1, imm)
    }

    pub fn lbu(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, 0b100, rd, rs1, imm)
    }

    pub fn lw(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, 0b010, rd, rs1, imm)
    }

    pub fn sd(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.s(OP_STORE, 0b011, rs1, rs2, imm)
    }

    pub fn sw(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.s(OP_STORE, 0b010, rs1, rs2, imm)
    }

    pub fn sb(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.s(OP_STORE, 0b000, rs1, rs2, imm)
    }

    pub fn beq(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.s(OP_BRANCH, 0b000, rs1, rs2, imm)
    }

    pub fn bne(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.s(OP_BRANCH, 0b001, rs1, rs2, imm)
    }

    pub fn jal(mut self, rd: u32, imm: i32) -> Self {
        self.opcode = OP_JAL;
        self.rd = rd;
        self.imm = imm;
        self
    }

    pub fn jalr(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_JALR, 0b000, rd, rs1, imm)
    }

    pub fn lui(mut self, rd: u32, imm: i32) -> Self {
        self.opcode = OP_LUI;
        self.rd = rd;
        self.imm = imm;
        self
    }

    pub fn auipc(mut self, rd: u32, imm: i32) -> Self {
        self.opcode = OP_AUIPC;
        self.rd = rd;
        self.imm = imm;
        self
    }

    pub fn csrrw(self, rd: u32, csr: u32, rs1: u32) -> Self {
        self.i(OP_SYSTEM, CSRRW, rd, rs1, csr as i32)
    }

    pub fn csrrs(self, rd: u32, csr: u32, rs1: u32) -> Self {
        self.i(OP_SYSTEM, CSRRS, rd, rs1, csr as i32)
    }

    pub fn ecall(self) -> Self {
        self.i(OP_SYSTEM, 0, 0, 0, 0)
    }

    pub fn ebreak(self) -> Self {
        self.i(OP_SYSTEM, 0, 0, 0, 1)
    }

    pub fn mret(self) -> Self {
        self.i(OP_SYSTEM, 0, 0, 0, 0x302)
    }

    pub fn nop(self) -> Self {
        self.addi(0, 0, 0)
    }

    pub fn build(self) -> u32 {
        let opcode = self.opcode & 0x7F;
        let rd = (self.rd & 0x1F) << 7;
        let funct3 = (self.funct3 & 0x7) << 12;
        let rs1 = (self.rs1 & 0x1F) << 15;
        let rs2 = (self.rs2 & 0x1F) << 20;
        let funct7 = (self.funct7 & 0x7F) << 25;

        match opcode {
            OP_REG | OP_REG_32 => funct7 | rs2 | rs1 | funct3 | rd | opcode,
            OP_IMM | OP_IMM_32 | OP_LOAD | OP_JALR | OP_SYSTEM => {
                let imm_val = (self.imm as u32) & 0xFFF;
                (imm_val << 20) | rs1 | funct3 | rd | opcode
            }
            OP_STORE => {
                let imm_val = self.imm as u32;
                let imm_11_5 = ((imm_val >> 5) & 0x7F) << 25;
                let imm_4_0 = (imm_val & 0x1F) << 7;
                imm_11_5 | rs2 | rs1 | funct3 | imm_4_0 | opcode
            }
            OP_BRANCH => {
                let imm_val = self.imm as u32;
                let bit_12 = ((imm_val >> 12) & 0x1) << 31;
                let bits_10_5 = ((imm_val >> 5) & 0x3F) << 25;
                let bits_4_1 = ((imm_val >> 1) & 0xF) << 8;
                let bit_11 = ((imm_val >> 11) & 0x1) << 7;
                bit_12 | bits_10_5 | rs2 | rs1 | funct3 | bits_4_1 | bit_11 | opcode
            }
            OP_LUI | OP_AUIPC => {
                // `imm` is the 20-bit upper immediate, unshifted.
                let imm_val = (self.imm as u32) & 0xFFFFF;
                (imm_val << 12) | rd | opcode
            }
            OP_JAL => {
                let imm_val = self.imm as u32;
                let bit_20 = ((imm_val >> 20) & 0x1) << 31;
                let bits_10_1 = ((imm_val >> 1) & 0x3FF) << 21;
                let bit_11 = ((imm_val >> 11) & 0x1) << 20;
                let bits_19_12 = ((imm_val >> 12) & 0xFF) << 12;
                bit_20 | bits_10_1 | bit_11 | bits_19_12 | rd | opcode
            }
            _ => panic!("Unsupported opcode: {opcode:#x}"),
        }
    }
}
