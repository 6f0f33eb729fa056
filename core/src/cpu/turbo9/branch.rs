use super::{CcFlag, Instruction, Turbo9};
use crate::core::Bus;

impl Turbo9 {
    /// Evaluate the branch condition for a short or long branch.
    fn branch_condition(&self, instruction: Instruction) -> bool {
        use Instruction::*;

        let c = self.flag(CcFlag::C);
        let z = self.flag(CcFlag::Z);
        let n = self.flag(CcFlag::N);
        let v = self.flag(CcFlag::V);
        match instruction {
            Bra | Lbra => true,
            Brn | Lbrn => false,
            Bhi | Lbhi => !c && !z,
            Bls | Lbls => c || z,
            Bcc | Lbcc => !c,
            Bcs | Lbcs => c,
            Bne | Lbne => !z,
            Beq | Lbeq => z,
            Bvc | Lbvc => !v,
            Bvs | Lbvs => v,
            Bpl | Lbpl => !n,
            Bmi | Lbmi => n,
            Bge | Lbge => n == v,
            Blt | Lblt => n != v,
            Bgt | Lbgt => n == v && !z,
            Ble | Lble => n != v || z,
            _ => false,
        }
    }

    /// Bcc/LBcc: PC = target when the condition holds. A taken long
    /// conditional branch costs one extra cycle.
    pub(crate) fn op_branch(&mut self, instruction: Instruction, long: bool) -> u32 {
        if !self.branch_condition(instruction) {
            return 0;
        }
        self.pc = self.ea;
        (long && instruction != Instruction::Lbra) as u32
    }

    /// BSR/LBSR/JSR: push the return address on S, PC = target.
    pub(crate) fn op_call<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u32 {
        self.push_word_s(bus, self.pc);
        self.pc = self.ea;
        0
    }

    pub(crate) fn op_jmp(&mut self) -> u32 {
        self.pc = self.ea;
        0
    }

    /// RTS: pull PC from S.
    pub(crate) fn op_rts<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u32 {
        self.pc = self.pull_word_s(bus);
        0
    }
}
