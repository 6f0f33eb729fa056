use crate::core::Bus;
use crate::cpu::turbo9::{Accumulator, CcFlag, Turbo9};

impl Turbo9 {
    /// ADDA/ADDB/ADCA/ADCB: acc = acc + M (+ C).
    /// H set on carry out of bit 3. V set on signed overflow. C set on carry out of bit 7.
    pub(crate) fn op_add8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        acc: Accumulator,
        with_carry: bool,
    ) -> u32 {
        let lhs = self.acc(acc);
        let rhs = self.read_operand8(bus);
        let carry_in = (with_carry && self.flag(CcFlag::C)) as u16;
        let sum = lhs as u16 + rhs as u16 + carry_in;
        let result = sum as u8;
        self.set_flag(CcFlag::H, (lhs ^ rhs ^ result) & 0x10 != 0);
        let overflow = (lhs ^ result) & (rhs ^ result) & 0x80 != 0;
        self.set_flags_arithmetic(result, overflow, sum > 0xFF);
        self.set_acc(acc, result);
        0
    }

    /// SUBA/SUBB/SBCA/SBCB: acc = acc - M (- C). H is left unchanged.
    pub(crate) fn op_sub8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        acc: Accumulator,
        with_borrow: bool,
    ) -> u32 {
        let rhs = self.read_operand8(bus);
        let borrow_in = with_borrow && self.flag(CcFlag::C);
        let result = self.perform_sub8(self.acc(acc), rhs, borrow_in);
        self.set_acc(acc, result);
        0
    }

    /// CMPA/CMPB: flags from acc - M, result discarded.
    pub(crate) fn op_cmp8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        acc: Accumulator,
    ) -> u32 {
        let rhs = self.read_operand8(bus);
        self.perform_sub8(self.acc(acc), rhs, false);
        0
    }

    #[inline]
    fn perform_sub8(&mut self, lhs: u8, rhs: u8, borrow_in: bool) -> u8 {
        let subtrahend = rhs as u16 + borrow_in as u16;
        let result = (lhs as u16).wrapping_sub(subtrahend) as u8;
        let overflow = (lhs ^ rhs) & (lhs ^ result) & 0x80 != 0;
        self.set_flags_arithmetic(result, overflow, (lhs as u16) < subtrahend);
        result
    }

    pub(crate) fn op_and8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        acc: Accumulator,
    ) -> u32 {
        let result = self.acc(acc) & self.read_operand8(bus);
        self.set_flags_logical(result);
        self.set_acc(acc, result);
        0
    }

    /// BITA/BITB: flags from acc & M, result discarded.
    pub(crate) fn op_bit8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        acc: Accumulator,
    ) -> u32 {
        let result = self.acc(acc) & self.read_operand8(bus);
        self.set_flags_logical(result);
        0
    }

    pub(crate) fn op_eor8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        acc: Accumulator,
    ) -> u32 {
        let result = self.acc(acc) ^ self.read_operand8(bus);
        self.set_flags_logical(result);
        self.set_acc(acc, result);
        0
    }

    pub(crate) fn op_or8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        acc: Accumulator,
    ) -> u32 {
        let result = self.acc(acc) | self.read_operand8(bus);
        self.set_flags_logical(result);
        self.set_acc(acc, result);
        0
    }

    /// ANDCC: clear CC bits. Used to unmask interrupts (ANDCC #$AF).
    pub(crate) fn op_andcc<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u32 {
        self.cc &= self.read_operand8(bus);
        0
    }

    /// ORCC: set CC bits.
    pub(crate) fn op_orcc<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u32 {
        self.cc |= self.read_operand8(bus);
        0
    }
}
