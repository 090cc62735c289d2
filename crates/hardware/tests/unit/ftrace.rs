use pretty_assertions::assert_eq;
use rstest::rstest;
use rvsdb_core::isa::abi::{REG_RA, REG_ZERO};
use rvsdb_core::sim::ftrace::{FuncTracer, Transfer, classify};
use rvsdb_core::sim::symbols::{Symbol, SymbolTable};

use crate::common::InstructionBuilder;

const MAIN: u64 = 0x8000_0000;
const F: u64 = 0x8000_0100;
const G: u64 = 0x8000_0200;
const T0: u32 = 5;

fn symbols() -> SymbolTable {
    let sym = |name: &str, start: u64| Symbol {
        name: name.to_owned(),
        start,
        end: start + 0x100,
    };
    SymbolTable::new(vec![sym("g", G), sym("main", MAIN), sym("f", F)])
}

fn jal(rd: usize) -> u32 {
    InstructionBuilder::new().jal(rd as u32, 0x40).build()
}

fn jalr(rd: usize, rs1: u32, imm: i32) -> u32 {
    InstructionBuilder::new().jalr(rd as u32, rs1, imm).build()
}

#[rstest]
#[case(jal(REG_RA), F + 0x40, Some(Transfer::Call))]
#[case(jal(REG_ZERO), F, Some(Transfer::TailCall))]
#[case(jal(REG_ZERO), F + 0x40, None)]
#[case(jalr(REG_RA, T0, 0), F, Some(Transfer::Call))]
#[case(jalr(REG_ZERO, REG_RA as u32, 0), MAIN, Some(Transfer::Return))]
#[case(jalr(REG_ZERO, REG_RA as u32, 4), MAIN, None)]
#[case(jalr(REG_ZERO, T0, 0), G, Some(Transfer::TailCall))]
#[case(InstructionBuilder::new().addi(10, 0, 1).build(), MAIN, None)]
fn test_classify(#[case] inst: u32, #[case] dnpc: u64, #[case] expected: Option<Transfer>) {
    assert_eq!(classify(inst, dnpc, &symbols()), expected);
}

#[test]
fn test_nested_calls_balance() {
    let syms = symbols();
    let mut ft = FuncTracer::new();

    let ev = ft.on_step(&syms, MAIN + 0x10, jal(REG_RA), F);
    assert_eq!(ev, ["0x80000010: call [f@0x80000100]"]);
    let ev = ft.on_step(&syms, F + 0x8, jalr(REG_RA, T0, 0), G);
    assert_eq!(ev, ["0x80000108:  call [g@0x80000200]"]);
    assert_eq!(ft.depth(), 2);

    let ret = jalr(REG_ZERO, REG_RA as u32, 0);
    let ev = ft.on_step(&syms, G + 0x20, ret, F + 0xc);
    assert_eq!(ev, ["0x80000220:  ret  [g]"]);
    let ev = ft.on_step(&syms, F + 0x30, ret, MAIN + 0x14);
    assert_eq!(ev, ["0x80000130: ret  [f]"]);
    assert_eq!(ft.depth(), 0);
}

#[test]
fn test_tail_call_synthesises_return() {
    let syms = symbols();
    let mut ft = FuncTracer::new();

    let _ = ft.on_step(&syms, MAIN + 0x10, jal(REG_RA), F);
    // f ends in `jr t0` to g.
    let ev = ft.on_step(&syms, F + 0x20, jalr(REG_ZERO, T0, 0), G);
    assert_eq!(ev, ["0x80000120:  call [g@0x80000200]"]);
    assert_eq!(ft.pending(), 1);

    let ev = ft.on_step(&syms, G + 0x10, jalr(REG_ZERO, REG_RA as u32, 0), MAIN + 0x14);
    assert_eq!(ev, ["0x80000210:  ret  [g]", "0x80000120: ret  [f]"]);
    assert_eq!(ft.depth(), 0);
    assert_eq!(ft.pending(), 0);
}

#[test]
fn test_chained_tail_calls() {
    let syms = symbols();
    let mut ft = FuncTracer::new();

    let _ = ft.call(&syms, MAIN, F, false);
    let _ = ft.call(&syms, F + 4, G, true);
    let _ = ft.call(&syms, G + 4, F, true);
    assert_eq!(ft.depth(), 3);

    let mut events = Vec::new();
    ft.ret(&syms, F + 8, &mut events);
    assert_eq!(events.len(), 3);
    assert_eq!(ft.depth(), 0);
    assert_eq!(ft.pending(), 0);
}

#[test]
fn test_return_at_depth_zero_saturates() {
    let syms = symbols();
    let mut ft = FuncTracer::new();
    let mut events = Vec::new();
    ft.ret(&syms, MAIN, &mut events);
    assert_eq!(ft.depth(), 0);
    assert_eq!(events, ["0x80000000: ret  [main]"]);
}

#[test]
fn test_unknown_target_name() {
    let syms = symbols();
    let mut ft = FuncTracer::new();
    let line = ft.call(&syms, MAIN, 0x9000_0000, false);
    assert_eq!(line, "0x80000000: call [???@0x90000000]");
}
