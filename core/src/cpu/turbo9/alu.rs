use super::{Accumulator, CcFlag, Turbo9};

mod binary;
mod shift;
mod unary;
mod word;

impl Turbo9 {
    #[inline]
    pub(crate) fn acc(&self, acc: Accumulator) -> u8 {
        match acc {
            Accumulator::A => self.a,
            Accumulator::B => self.b,
        }
    }

    #[inline]
    pub(crate) fn set_acc(&mut self, acc: Accumulator, val: u8) {
        match acc {
            Accumulator::A => self.a = val,
            Accumulator::B => self.b = val,
        }
    }

    /// Helper to set N, Z, V (cleared) flags for logical operations
    #[inline]
    pub(crate) fn set_flags_logical(&mut self, result: u8) {
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, false);
    }

    /// Helper to set N, Z, V, C flags for arithmetic operations
    #[inline]
    pub(crate) fn set_flags_arithmetic(&mut self, result: u8, overflow: bool, carry: bool) {
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, overflow);
        self.set_flag(CcFlag::C, carry);
    }

    /// Helper to set N, Z, V, C flags for 16-bit arithmetic
    #[inline]
    pub(crate) fn set_flags_arithmetic16(&mut self, result: u16, overflow: bool, carry: bool) {
        self.set_flag(CcFlag::N, result & 0x8000 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, overflow);
        self.set_flag(CcFlag::C, carry);
    }

    /// Helper to set N, Z, V (cleared) flags for 16-bit logical operations
    #[inline]
    pub(crate) fn set_flags_logical16(&mut self, result: u16) {
        self.set_flag(CcFlag::N, result & 0x8000 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, false);
    }

    /// SEX: sign-extend B into A.
    /// N set if result is negative. Z set if D (A:B) is zero.
    pub(crate) fn op_sex(&mut self) -> u32 {
        self.a = if self.b & 0x80 != 0 { 0xFF } else { 0x00 };
        let d = self.d();
        self.set_flag(CcFlag::N, d & 0x8000 != 0);
        self.set_flag(CcFlag::Z, d == 0);
        0
    }

    /// ABX: X = X + B (unsigned). No flags affected.
    pub(crate) fn op_abx(&mut self) -> u32 {
        self.x = self.x.wrapping_add(self.b as u16);
        0
    }

    /// MUL: D = A * B, unsigned. A receives the high byte, B the low byte.
    /// Z set if the 16-bit product is zero. C set from bit 7 of B.
    pub(crate) fn op_mul(&mut self) -> u32 {
        let product = (self.a as u16) * (self.b as u16);
        self.set_d(product);
        self.set_flag(CcFlag::Z, product == 0);
        self.set_flag(CcFlag::C, self.b & 0x80 != 0);
        0
    }

    /// DAA: decimal adjust A after a BCD ADDA/ADCA.
    /// N set if result bit 7 is set. Z set if result is zero.
    /// C set if BCD carry occurred or C was already set. V undefined (left unchanged).
    pub(crate) fn op_daa(&mut self) -> u32 {
        let mut correction: u8 = 0;
        let mut carry = self.flag(CcFlag::C);
        let msn = self.a & 0xF0;
        let lsn = self.a & 0x0F;

        if lsn > 0x09 || self.flag(CcFlag::H) {
            correction |= 0x06;
        }

        if msn > 0x90 || carry || (msn > 0x80 && lsn > 0x09) {
            correction |= 0x60;
            carry = true;
        }

        self.a = self.a.wrapping_add(correction);
        self.set_flag(CcFlag::N, self.a & 0x80 != 0);
        self.set_flag(CcFlag::Z, self.a == 0);
        self.set_flag(CcFlag::C, carry);
        0
    }
}
