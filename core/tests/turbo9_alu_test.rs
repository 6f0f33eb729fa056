use hyper9_core::cpu::turbo9::CcFlag;
mod common;
use common::{flag, run, setup};

#[test]
fn test_tst_sets_n_and_z_and_clears_v() {
    // LDA #$FA, ORCC #$03 (V, C), TSTA
    let (mut cpu, mut bus) = setup(&[0x86, 0xFA, 0x1A, 0x03, 0x4D]);
    run(&mut cpu, &mut bus, 3);
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::V));
    assert!(flag(&cpu, CcFlag::C)); // C unaffected

    // LDB #$3A, ORCC #$02, TSTB
    let (mut cpu, mut bus) = setup(&[0xC6, 0x3A, 0x1A, 0x02, 0x5D]);
    run(&mut cpu, &mut bus, 3);
    assert!(!flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::V));

    // LDA #$00, ORCC #$0A (N, V), TSTA
    let (mut cpu, mut bus) = setup(&[0x86, 0x00, 0x1A, 0x0A, 0x4D]);
    run(&mut cpu, &mut bus, 3);
    assert!(!flag(&cpu, CcFlag::N));
    assert!(flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::V));
}

#[test]
fn test_tst_memory_does_not_write_back() {
    // ORCC #$02, TST $2000
    let (mut cpu, mut bus) = setup(&[0x1A, 0x02, 0x7D, 0x20, 0x00]);
    bus.memory[0x2000] = 0x80;
    run(&mut cpu, &mut bus, 2);
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::V));
    assert_eq!(bus.memory[0x2000], 0x80);
}

#[test]
fn test_mul_stores_both_product_bytes() {
    // LDA #$0C, LDB #$0A, MUL
    let (mut cpu, mut bus) = setup(&[0x86, 0x0C, 0xC6, 0x0A, 0x3D]);
    run(&mut cpu, &mut bus, 2);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cycles, 11);
    assert_eq!(cpu.a, 0x00);
    assert_eq!(cpu.b, 0x78);
    assert_eq!(cpu.d(), 0x0078);
    assert!(!flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::C));

    // $FF * $FF = $FE01: the high byte must land in A
    let (mut cpu, mut bus) = setup(&[0x86, 0xFF, 0xC6, 0xFF, 0x3D]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.a, 0xFE);
    assert_eq!(cpu.b, 0x01);

    // $10 * $08 = $0080: C mirrors bit 7 of B
    let (mut cpu, mut bus) = setup(&[0x86, 0x10, 0xC6, 0x08, 0x3D]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.d(), 0x0080);
    assert!(flag(&cpu, CcFlag::C));

    // Zero product
    let (mut cpu, mut bus) = setup(&[0x86, 0x00, 0xC6, 0x55, 0x3D]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.d(), 0x0000);
    assert!(flag(&cpu, CcFlag::Z));
}

#[test]
fn test_daa_after_bcd_add() {
    // LDA #$19, ADDA #$28, DAA: 19 + 28 = 47
    let (mut cpu, mut bus) = setup(&[0x86, 0x19, 0x8B, 0x28, 0x19]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x41);
    assert!(flag(&cpu, CcFlag::H));
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x47);
    assert!(!flag(&cpu, CcFlag::C));

    // LDA #$58, ADDA #$67, DAA: 58 + 67 = 125, crosses 99
    let (mut cpu, mut bus) = setup(&[0x86, 0x58, 0x8B, 0x67, 0x19]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.a, 0x25);
    assert!(flag(&cpu, CcFlag::C));
    assert!(!flag(&cpu, CcFlag::Z));

    // LDA #$50, ADDA #$50, DAA: 50 + 50 = 100
    let (mut cpu, mut bus) = setup(&[0x86, 0x50, 0x8B, 0x50, 0x19]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.a, 0x00);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::Z));
}

#[test]
fn test_add_and_subtract_flags() {
    // LDA #$7F, ADDA #$01: signed overflow and half carry
    let (mut cpu, mut bus) = setup(&[0x86, 0x7F, 0x8B, 0x01]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x80);
    assert!(flag(&cpu, CcFlag::V));
    assert!(flag(&cpu, CcFlag::N));
    assert!(flag(&cpu, CcFlag::H));
    assert!(!flag(&cpu, CcFlag::C));

    // LDA #$00, SUBA #$01: borrow
    let (mut cpu, mut bus) = setup(&[0x86, 0x00, 0x80, 0x01]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0xFF);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::V));

    // ORCC #$01, LDB #$10, SBCB #$0F: 10 - 0F - 1 = 0
    let (mut cpu, mut bus) = setup(&[0x1A, 0x01, 0xC6, 0x10, 0xC2, 0x0F]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.b, 0x00);
    assert!(flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::C));

    // ORCC #$01, LDA #$FF, ADCA #$00: carry in wraps to zero
    let (mut cpu, mut bus) = setup(&[0x1A, 0x01, 0x86, 0xFF, 0x89, 0x00]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.a, 0x00);
    assert!(flag(&cpu, CcFlag::Z));
    assert!(flag(&cpu, CcFlag::C));
}

#[test]
fn test_compare_leaves_accumulator() {
    // LDA #$40, CMPA #$41
    let (mut cpu, mut bus) = setup(&[0x86, 0x40, 0x81, 0x41]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x40);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::Z));
}

#[test]
fn test_logical_ops() {
    // LDA #$F0, ANDA #$3C, ORA #$01, EORA #$FF
    let (mut cpu, mut bus) = setup(&[0x86, 0xF0, 0x84, 0x3C, 0x8A, 0x01, 0x88, 0xFF]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x30);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x31);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0xCE);
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::V));

    // LDB #$0F, BITB #$F0: Z set, B unchanged
    let (mut cpu, mut bus) = setup(&[0xC6, 0x0F, 0xC5, 0xF0]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.b, 0x0F);
    assert!(flag(&cpu, CcFlag::Z));
}

#[test]
fn test_unary_register_ops() {
    // LDA #$80, NEGA: overflow, borrow
    let (mut cpu, mut bus) = setup(&[0x86, 0x80, 0x40]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x80);
    assert!(flag(&cpu, CcFlag::V));
    assert!(flag(&cpu, CcFlag::C));

    // LDB #$AA, COMB
    let (mut cpu, mut bus) = setup(&[0xC6, 0xAA, 0x53]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.b, 0x55);
    assert!(flag(&cpu, CcFlag::C));
    assert!(!flag(&cpu, CcFlag::V));

    // LDA #$7F, INCA, DECA
    let (mut cpu, mut bus) = setup(&[0x86, 0x7F, 0x4C, 0x4A]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x80);
    assert!(flag(&cpu, CcFlag::V));
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x7F);
    assert!(flag(&cpu, CcFlag::V));

    // ORCC #$0B, CLRA
    let (mut cpu, mut bus) = setup(&[0x1A, 0x0B, 0x4F]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x00);
    assert_eq!(cpu.cc & 0x0F, CcFlag::Z as u8);
}

#[test]
fn test_unary_memory_read_modify_write() {
    // INC $2000, NEG $2001
    let (mut cpu, mut bus) = setup(&[0x7C, 0x20, 0x00, 0x70, 0x20, 0x01]);
    bus.memory[0x2000] = 0x41;
    bus.memory[0x2001] = 0x01;
    run(&mut cpu, &mut bus, 2);
    assert_eq!(bus.memory[0x2000], 0x42);
    assert_eq!(bus.memory[0x2001], 0xFF);
    assert!(flag(&cpu, CcFlag::C));
}

#[test]
fn test_shifts_and_rotates() {
    // LDA #$40, ASLA: V = N xor C
    let (mut cpu, mut bus) = setup(&[0x86, 0x40, 0x48]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x80);
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::V));

    // LDA #$01, ORCC #$02, LSRA: V untouched
    let (mut cpu, mut bus) = setup(&[0x86, 0x01, 0x1A, 0x02, 0x44]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.a, 0x00);
    assert!(flag(&cpu, CcFlag::Z));
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::V));

    // LDA #$81, ASRA: sign bit kept
    let (mut cpu, mut bus) = setup(&[0x86, 0x81, 0x47]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0xC0);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::N));

    // ORCC #$01, LDA #$80, ROLA: carry rotates through
    let (mut cpu, mut bus) = setup(&[0x1A, 0x01, 0x86, 0x80, 0x49]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.a, 0x01);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::V));

    // ORCC #$01, LDB #$02, RORB
    let (mut cpu, mut bus) = setup(&[0x1A, 0x01, 0xC6, 0x02, 0x56]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.b, 0x81);
    assert!(!flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::N));
}

#[test]
fn test_word_arithmetic() {
    // LDD #$FFFF, ADDD #$0001
    let (mut cpu, mut bus) = setup(&[0xCC, 0xFF, 0xFF, 0xC3, 0x00, 0x01]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.d(), 0x0000);
    assert!(flag(&cpu, CcFlag::Z));
    assert!(flag(&cpu, CcFlag::C));

    // LDD #$8000, SUBD #$0001: signed overflow
    let (mut cpu, mut bus) = setup(&[0xCC, 0x80, 0x00, 0x83, 0x00, 0x01]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.d(), 0x7FFF);
    assert!(flag(&cpu, CcFlag::V));
    assert!(!flag(&cpu, CcFlag::C));

    // LDX #$1234, CMPX #$1234; LDY #$0010, CMPY #$0020
    let (mut cpu, mut bus) = setup(&[
        0x8E, 0x12, 0x34, 0x8C, 0x12, 0x34, 0x10, 0x8E, 0x00, 0x10, 0x10, 0x8C, 0x00, 0x20,
    ]);
    run(&mut cpu, &mut bus, 2);
    assert!(flag(&cpu, CcFlag::Z));
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.y, 0x0010);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::N));
}

#[test]
fn test_sex_and_abx() {
    // LDB #$80, SEX
    let (mut cpu, mut bus) = setup(&[0xC6, 0x80, 0x1D]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.d(), 0xFF80);
    assert!(flag(&cpu, CcFlag::N));

    // LDX #$1000, LDB #$FF, ABX: B is unsigned
    let (mut cpu, mut bus) = setup(&[0x8E, 0x10, 0x00, 0xC6, 0xFF, 0x3A]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.x, 0x10FF);
}

#[test]
fn test_andcc_orcc() {
    // ORCC #$FF, ANDCC #$AF
    let (mut cpu, mut bus) = setup(&[0x1A, 0xFF, 0x1C, 0xAF]);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.cc, 0xFF);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.cc, 0xAF);
    assert!(!flag(&cpu, CcFlag::I));
    assert!(!flag(&cpu, CcFlag::F));
}
