use crate::core::Bus;
use crate::cpu::turbo9::{Register, Turbo9};

impl Turbo9 {
    /// ADDD: D = D + M:M+1.
    pub(crate) fn op_addd<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u32 {
        let lhs = self.d();
        let rhs = self.read_operand16(bus);
        let (result, carry) = lhs.overflowing_add(rhs);
        let overflow = (lhs ^ result) & (rhs ^ result) & 0x8000 != 0;
        self.set_flags_arithmetic16(result, overflow, carry);
        self.set_d(result);
        0
    }

    /// SUBD: D = D - M:M+1.
    pub(crate) fn op_subd<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u32 {
        let rhs = self.read_operand16(bus);
        let result = self.perform_sub16(self.d(), rhs);
        self.set_d(result);
        0
    }

    /// CMPD/CMPX/CMPY/CMPU/CMPS: flags from reg - M:M+1.
    pub(crate) fn op_cmp16<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        register: Register,
    ) -> u32 {
        let rhs = self.read_operand16(bus);
        self.perform_sub16(self.register_value(register), rhs);
        0
    }

    #[inline]
    fn perform_sub16(&mut self, lhs: u16, rhs: u16) -> u16 {
        let (result, borrow) = lhs.overflowing_sub(rhs);
        let overflow = (lhs ^ rhs) & (lhs ^ result) & 0x8000 != 0;
        self.set_flags_arithmetic16(result, overflow, borrow);
        result
    }
}
