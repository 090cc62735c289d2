use pretty_assertions::assert_eq;
use rstest::rstest;
use rvsdb_core::isa::disasm::disassemble;

use crate::common::InstructionBuilder;

const PC: u64 = 0x8000_0000;

#[rstest]
#[case(InstructionBuilder::new().addi(10, 0, -1).build(), "addi a0, zero, -1")]
#[case(InstructionBuilder::new().add(5, 6, 7).build(), "add t0, t1, t2")]
#[case(InstructionBuilder::new().sub(1, 2, 3).build(), "sub ra, sp, gp")]
#[case(InstructionBuilder::new().mul(10, 11, 12).build(), "mul a0, a1, a2")]
#[case(InstructionBuilder::new().div(10, 11, 12).build(), "div a0, a1, a2")]
#[case(InstructionBuilder::new().addiw(10, 10, 1).build(), "addiw a0, a0, 1")]
#[case(InstructionBuilder::new().ld(10, 2, 8).build(), "ld a0, 8(sp)")]
#[case(InstructionBuilder::new().sd(2, 1, -8).build(), "sd ra, -8(sp)")]
#[case(InstructionBuilder::new().beq(10, 0, 16).build(), "beq a0, zero, 0x80000010")]
#[case(InstructionBuilder::new().bne(10, 0, -4).build(), "bne a0, zero, 0x7ffffffc")]
#[case(InstructionBuilder::new().jal(1, 0x100).build(), "jal ra, 0x80000100")]
#[case(InstructionBuilder::new().jalr(0, 1, 0).build(), "jalr zero, 0(ra)")]
#[case(InstructionBuilder::new().lui(5, 0x12345).build(), "lui t0, 0x12345")]
#[case(InstructionBuilder::new().auipc(5, 0).build(), "auipc t0, 0x0")]
#[case(InstructionBuilder::new().csrrw(0, 0x305, 5).build(), "csrrw zero, mtvec, t0")]
#[case(InstructionBuilder::new().csrrs(6, 0x341, 0).build(), "csrrs t1, mepc, zero")]
#[case(InstructionBuilder::new().ecall().build(), "ecall")]
#[case(InstructionBuilder::new().ebreak().build(), "ebreak")]
#[case(InstructionBuilder::new().mret().build(), "mret")]
#[case(0x0000_0000, "unknown (0x00000000)")]
fn test_disassemble(#[case] inst: u32, #[case] expected: &str) {
    assert_eq!(disassemble(PC, inst), expected);
}
