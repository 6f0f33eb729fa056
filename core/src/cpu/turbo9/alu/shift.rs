use crate::cpu::turbo9::{CcFlag, Turbo9};

impl Turbo9 {
    /// Left shifts and rotates: N, Z from result, C from the bit shifted
    /// out, V = N xor C.
    #[inline]
    fn set_flags_shift(&mut self, result: u8, carry: bool) {
        let negative = result & 0x80 != 0;
        self.set_flag(CcFlag::N, negative);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, negative ^ carry);
        self.set_flag(CcFlag::C, carry);
    }

    /// Right shifts and rotates leave V unchanged.
    #[inline]
    fn set_flags_shift_right(&mut self, result: u8, carry: bool) {
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::C, carry);
    }

    #[inline]
    pub(crate) fn perform_asl(&mut self, val: u8) -> u8 {
        let carry = val & 0x80 != 0;
        let result = val << 1;
        self.set_flags_shift(result, carry);
        result
    }

    #[inline]
    pub(crate) fn perform_asr(&mut self, val: u8) -> u8 {
        let carry = val & 0x01 != 0;
        let result = ((val as i8) >> 1) as u8;
        self.set_flags_shift_right(result, carry);
        result
    }

    #[inline]
    pub(crate) fn perform_lsr(&mut self, val: u8) -> u8 {
        let carry = val & 0x01 != 0;
        let result = val >> 1;
        self.set_flags_shift_right(result, carry);
        result
    }

    #[inline]
    pub(crate) fn perform_rol(&mut self, val: u8) -> u8 {
        let old_carry = self.flag(CcFlag::C);
        let new_carry = val & 0x80 != 0;
        let result = (val << 1) | (old_carry as u8);
        self.set_flags_shift(result, new_carry);
        result
    }

    #[inline]
    pub(crate) fn perform_ror(&mut self, val: u8) -> u8 {
        let old_carry = self.flag(CcFlag::C);
        let new_carry = val & 0x01 != 0;
        let result = (val >> 1) | ((old_carry as u8) << 7);
        self.set_flags_shift_right(result, new_carry);
        result
    }
}
