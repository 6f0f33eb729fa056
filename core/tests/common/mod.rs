#![allow(dead_code)]

use hyper9_core::core::{Bus, BusMaster};
use hyper9_core::cpu::Turbo9;
use hyper9_core::cpu::turbo9::CcFlag;

/// Minimal bus for testing: flat 64KB read/write memory, no peripherals.
pub struct TestBus {
    pub memory: [u8; 0x10000],
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
    }

    pub fn set_word(&mut self, addr: u16, val: u16) {
        let [hi, lo] = val.to_be_bytes();
        self.memory[addr as usize] = hi;
        self.memory[addr.wrapping_add(1) as usize] = lo;
    }

    pub fn word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([
            self.memory[addr as usize],
            self.memory[addr.wrapping_add(1) as usize],
        ])
    }
}

impl Bus for TestBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.memory[addr as usize] = data;
    }
}

/// A CPU with program `code` at $0000, S at $1000 and CC cleared.
pub fn setup(code: &[u8]) -> (Turbo9, TestBus) {
    let mut cpu = Turbo9::new();
    let mut bus = TestBus::new();
    bus.load(0x0000, code);
    cpu.s = 0x1000;
    (cpu, bus)
}

/// Step `count` instructions, panicking on a CPU error.
pub fn run(cpu: &mut Turbo9, bus: &mut TestBus, count: usize) {
    for _ in 0..count {
        cpu.step(bus).unwrap();
    }
}

pub fn flag(cpu: &Turbo9, flag: CcFlag) -> bool {
    cpu.cc & flag as u8 != 0
}
