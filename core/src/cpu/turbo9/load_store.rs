use super::{Accumulator, CcFlag, Register, Turbo9, write_word};
use crate::core::{Bus, BusMaster};

impl Turbo9 {
    /// LDA/LDB: N, Z from the loaded value, V cleared.
    pub(crate) fn op_ld8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        acc: Accumulator,
    ) -> u32 {
        let val = self.read_operand8(bus);
        self.set_flags_logical(val);
        self.set_acc(acc, val);
        0
    }

    /// STA/STB: N, Z from the stored value, V cleared.
    pub(crate) fn op_st8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        acc: Accumulator,
    ) -> u32 {
        let val = self.acc(acc);
        self.set_flags_logical(val);
        bus.write(BusMaster::Cpu, self.ea, val);
        0
    }

    /// LDD/LDX/LDY/LDU/LDS: N, Z from the loaded word, V cleared.
    pub(crate) fn op_ld16<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        register: Register,
    ) -> u32 {
        let val = self.read_operand16(bus);
        self.set_flags_logical16(val);
        self.set_register_value(register, val);
        0
    }

    /// STD/STX/STY/STU/STS: big-endian store, N, Z from the word, V cleared.
    pub(crate) fn op_st16<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        register: Register,
    ) -> u32 {
        let val = self.register_value(register);
        self.set_flags_logical16(val);
        write_word(bus, self.ea, val);
        0
    }

    /// LEAX/LEAY set Z from the result. LEAU/LEAS affect no flags.
    pub(crate) fn op_lea(&mut self, register: Register) -> u32 {
        let ea = self.ea;
        self.set_register_value(register, ea);
        if matches!(register, Register::X | Register::Y) {
            self.set_flag(CcFlag::Z, ea == 0);
        }
        0
    }
}
