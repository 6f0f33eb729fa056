use hyper9_core::cpu::turbo9::CcFlag;
mod common;
use common::{flag, setup};

#[test]
fn test_post_increment_and_pre_decrement() {
    // LDA ,X+ ; LDD ,--Y ; STB ,U++
    let (mut cpu, mut bus) = setup(&[0xA6, 0x80, 0xEC, 0xA3, 0xE7, 0xC1]);
    bus.load(0x2000, &[0x11, 0x22]);
    cpu.x = 0x2000;
    cpu.y = 0x2002;
    cpu.u = 0x3000;

    assert_eq!(cpu.step(&mut bus).unwrap(), 4 + 2);
    assert_eq!(cpu.a, 0x11);
    assert_eq!(cpu.x, 0x2001);

    assert_eq!(cpu.step(&mut bus).unwrap(), 5 + 3);
    assert_eq!(cpu.d(), 0x1122);
    assert_eq!(cpu.y, 0x2000);

    cpu.step(&mut bus).unwrap();
    assert_eq!(bus.memory[0x3000], 0x22);
    assert_eq!(cpu.u, 0x3002);
}

#[test]
fn test_constant_offsets() {
    // LDA -5,U ; LDA -16,X ; LDA $0100,X
    let (mut cpu, mut bus) = setup(&[0xA6, 0x5B, 0xA6, 0x88, 0xF0, 0xA6, 0x89, 0x01, 0x00]);
    bus.memory[0x2000] = 0xA1;
    bus.memory[0x1FF0] = 0xA2;
    bus.memory[0x2100] = 0xA3;
    cpu.u = 0x2005;
    cpu.x = 0x2000;

    assert_eq!(cpu.step(&mut bus).unwrap(), 5);
    assert_eq!(cpu.a, 0xA1);
    assert_eq!(cpu.step(&mut bus).unwrap(), 5);
    assert_eq!(cpu.a, 0xA2);
    assert_eq!(cpu.step(&mut bus).unwrap(), 8);
    assert_eq!(cpu.a, 0xA3);
    assert_eq!(cpu.pc, 0x0009);
}

#[test]
fn test_accumulator_offsets_are_signed() {
    // LDA B,X ; LDB D,Y
    let (mut cpu, mut bus) = setup(&[0xA6, 0x85, 0xE6, 0xAB]);
    bus.memory[0x1FFF] = 0x5A;
    bus.memory[0x2000 + 0x5AFF] = 0x77;
    cpu.x = 0x2000;
    cpu.y = 0x2000;
    cpu.b = 0xFF;

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x5A);
    // D is now $5AFF
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.b, 0x77);
}

#[test]
fn test_pc_relative() {
    // LDA $10,PCR : PC after the operand is $0003
    let (mut cpu, mut bus) = setup(&[0xA6, 0x8C, 0x10]);
    bus.memory[0x0013] = 0xC3;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0xC3);
}

#[test]
fn test_indirect_forms() {
    // LDA [,X] ; LDA [$2000]
    let (mut cpu, mut bus) = setup(&[0xA6, 0x94, 0xA6, 0x9F, 0x20, 0x00]);
    bus.set_word(0x2000, 0x3000);
    bus.memory[0x3000] = 0x99;
    cpu.x = 0x2000;

    assert_eq!(cpu.step(&mut bus).unwrap(), 4 + 3);
    assert_eq!(cpu.a, 0x99);

    cpu.a = 0;
    assert_eq!(cpu.step(&mut bus).unwrap(), 4 + 5);
    assert_eq!(cpu.a, 0x99);
}

#[test]
fn test_lea_flags() {
    // LEAX 1,X (wraps to zero) ; LEAS -2,S ; LEAU ,Y
    let (mut cpu, mut bus) = setup(&[0x30, 0x01, 0x32, 0x7E, 0x33, 0xA4]);
    cpu.x = 0xFFFF;
    cpu.y = 0x1234;

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.x, 0x0000);
    assert!(flag(&cpu, CcFlag::Z));

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.s, 0x0FFE);
    assert!(flag(&cpu, CcFlag::Z)); // untouched

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.u, 0x1234);
}
