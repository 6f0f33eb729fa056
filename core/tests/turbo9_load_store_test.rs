use hyper9_core::cpu::CpuStateTrait;
use hyper9_core::cpu::turbo9::CcFlag;
mod common;
use common::{flag, run, setup};

#[test]
fn test_load_8bit_flags() {
    // LDA #$80 ; LDB #$00
    let (mut cpu, mut bus) = setup(&[0x86, 0x80, 0xC6, 0x00]);
    cpu.cc = CcFlag::V as u8 | CcFlag::C as u8;
    assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    assert_eq!(cpu.a, 0x80);
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::V));
    assert!(flag(&cpu, CcFlag::C)); // untouched

    cpu.step(&mut bus).unwrap();
    assert!(flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::N));
}

#[test]
fn test_direct_page_addressing() {
    // LDA <$10 ; STA <$11 with DP = $20
    let (mut cpu, mut bus) = setup(&[0x96, 0x10, 0x97, 0x11]);
    bus.memory[0x2010] = 0x5C;
    cpu.dp = 0x20;

    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.a, 0x5C);
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(bus.memory[0x2011], 0x5C);
}

#[test]
fn test_extended_store_sets_flags() {
    // STB $3000
    let (mut cpu, mut bus) = setup(&[0xF7, 0x30, 0x00]);
    cpu.b = 0xF0;
    assert_eq!(cpu.step(&mut bus).unwrap(), 5);
    assert_eq!(bus.memory[0x3000], 0xF0);
    assert!(flag(&cpu, CcFlag::N));
}

#[test]
fn test_word_loads_and_stores() {
    // LDX #$8000 ; LDY #$0000 ; LDD $2000 ; STD $2002 ; LDS #$0F00 ; LDU <$40
    let (mut cpu, mut bus) = setup(&[
        0x8E, 0x80, 0x00, 0x10, 0x8E, 0x00, 0x00, 0xFC, 0x20, 0x00, 0xFD, 0x20, 0x02, 0x10,
        0xCE, 0x0F, 0x00, 0xDE, 0x40,
    ]);
    bus.set_word(0x2000, 0xBEEF);
    bus.set_word(0x0040, 0x4455);

    assert_eq!(cpu.step(&mut bus).unwrap(), 3);
    assert_eq!(cpu.x, 0x8000);
    assert!(flag(&cpu, CcFlag::N));

    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.y, 0x0000);
    assert!(flag(&cpu, CcFlag::Z));

    assert_eq!(cpu.step(&mut bus).unwrap(), 6);
    assert_eq!(cpu.d(), 0xBEEF);

    assert_eq!(cpu.step(&mut bus).unwrap(), 6);
    assert_eq!(bus.memory[0x2002], 0xBE);
    assert_eq!(bus.memory[0x2003], 0xEF);

    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.s, 0x0F00);
    assert_eq!(cpu.u, 0x4455);
}

#[test]
fn test_undefined_opcode_is_two_cycle_no_op() {
    let (mut cpu, mut bus) = setup(&[0x01, 0x12]);
    cpu.a = 0x33;
    let before = cpu.snapshot();

    assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    assert_eq!(cpu.pc, 0x0001);
    assert_eq!(cpu.a, before.a);
    assert_eq!(cpu.cc, before.cc);
    assert_eq!(cpu.instructions_executed, 1);
}

#[test]
fn test_undefined_prefixed_opcode_consumes_both_bytes() {
    // $10 $86 is not a page-2 opcode
    let (mut cpu, mut bus) = setup(&[0x10, 0x86, 0x12]);
    assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    assert_eq!(cpu.pc, 0x0002);
    assert_eq!(cpu.cycles, 2);
}
