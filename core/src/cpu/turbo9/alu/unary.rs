use crate::core::{Bus, BusMaster};
use crate::cpu::turbo9::{Accumulator, CcFlag, Turbo9};

impl Turbo9 {
    // --- Internal Unary Helpers ---

    /// NEG: 0 - M. V set if M was 0x80. C set if M was non-zero.
    #[inline]
    pub(crate) fn perform_neg(&mut self, val: u8) -> u8 {
        let (result, borrow) = (0u8).overflowing_sub(val);
        let overflow = val == 0x80;
        self.set_flags_arithmetic(result, overflow, borrow);
        result
    }

    /// COM: one's complement. V cleared, C set.
    #[inline]
    pub(crate) fn perform_com(&mut self, val: u8) -> u8 {
        let result = !val;
        self.set_flags_logical(result);
        self.set_flag(CcFlag::C, true);
        result
    }

    /// CLR: N=0, Z=1, V=0, C=0.
    #[inline]
    pub(crate) fn perform_clr(&mut self, _val: u8) -> u8 {
        self.set_flag(CcFlag::N, false);
        self.set_flag(CcFlag::Z, true);
        self.set_flag(CcFlag::V, false);
        self.set_flag(CcFlag::C, false);
        0
    }

    /// INC: V set if M was 0x7F. C not affected.
    #[inline]
    pub(crate) fn perform_inc(&mut self, val: u8) -> u8 {
        let overflow = val == 0x7F;
        let result = val.wrapping_add(1);
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, overflow);
        result
    }

    /// DEC: V set if M was 0x80. C not affected.
    #[inline]
    pub(crate) fn perform_dec(&mut self, val: u8) -> u8 {
        let overflow = val == 0x80;
        let result = val.wrapping_sub(1);
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, overflow);
        result
    }

    /// TST: N and Z from the operand, V always cleared, C unaffected.
    #[inline]
    fn perform_tst(&mut self, val: u8) {
        self.set_flags_logical(val);
    }

    /// Apply a unary/shift operation to A or B.
    pub(crate) fn op_unary_acc(
        &mut self,
        acc: Accumulator,
        operation: fn(&mut Self, u8) -> u8,
    ) -> u32 {
        let val = self.acc(acc);
        let result = operation(self, val);
        self.set_acc(acc, result);
        0
    }

    /// Read-modify-write a unary/shift operation on the byte at the
    /// effective address.
    pub(crate) fn op_unary_mem<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        operation: fn(&mut Self, u8) -> u8,
    ) -> u32 {
        let val = self.read_operand8(bus);
        let result = operation(self, val);
        bus.write(BusMaster::Cpu, self.ea, result);
        0
    }

    pub(crate) fn op_tst_acc(&mut self, acc: Accumulator) -> u32 {
        self.perform_tst(self.acc(acc));
        0
    }

    /// TST memory: read-only, no write-back.
    pub(crate) fn op_tst_mem<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u32 {
        let val = self.read_operand8(bus);
        self.perform_tst(val);
        0
    }
}
