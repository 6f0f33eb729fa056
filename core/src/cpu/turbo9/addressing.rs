use super::{AddressMode, Turbo9, read_word};
use crate::core::{Bus, BusMaster};

/// Base register selected by bits 5-6 of an indexed postbyte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexRegister {
    X,
    Y,
    U,
    S,
}

impl IndexRegister {
    pub fn name(self) -> &'static str {
        match self {
            IndexRegister::X => "X",
            IndexRegister::Y => "Y",
            IndexRegister::U => "U",
            IndexRegister::S => "S",
        }
    }
}

/// Offset encoding selected by the low bits of an indexed postbyte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexedForm {
    /// 5-bit signed offset held in the postbyte itself.
    Offset5(i8),
    PostIncrement1,
    PostIncrement2,
    PreDecrement1,
    PreDecrement2,
    NoOffset,
    AccumulatorB,
    AccumulatorA,
    Offset8,
    Offset16,
    AccumulatorD,
    PcRelative8,
    PcRelative16,
    /// `[n16]`: absolute address, always indirect.
    ExtendedIndirect,
    /// Reserved encodings ($x7, $xA, $xE).
    Reserved,
}

/// A decoded indexed-mode postbyte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedPostbyte {
    pub register: IndexRegister,
    pub form: IndexedForm,
    pub indirect: bool,
}

impl IndexedPostbyte {
    pub fn decode(postbyte: u8) -> Self {
        let register = match (postbyte >> 5) & 0x03 {
            0 => IndexRegister::X,
            1 => IndexRegister::Y,
            2 => IndexRegister::U,
            _ => IndexRegister::S,
        };

        if postbyte & 0x80 == 0 {
            // Sign-extend the low five bits.
            let offset = ((postbyte << 3) as i8) >> 3;
            return Self {
                register,
                form: IndexedForm::Offset5(offset),
                indirect: false,
            };
        }

        let form = match postbyte & 0x0F {
            0x0 => IndexedForm::PostIncrement1,
            0x1 => IndexedForm::PostIncrement2,
            0x2 => IndexedForm::PreDecrement1,
            0x3 => IndexedForm::PreDecrement2,
            0x4 => IndexedForm::NoOffset,
            0x5 => IndexedForm::AccumulatorB,
            0x6 => IndexedForm::AccumulatorA,
            0x8 => IndexedForm::Offset8,
            0x9 => IndexedForm::Offset16,
            0xB => IndexedForm::AccumulatorD,
            0xC => IndexedForm::PcRelative8,
            0xD => IndexedForm::PcRelative16,
            0xF => IndexedForm::ExtendedIndirect,
            _ => IndexedForm::Reserved,
        };
        Self {
            register,
            form,
            indirect: postbyte & 0x10 != 0 || form == IndexedForm::ExtendedIndirect,
        }
    }

    /// Offset bytes that follow the postbyte.
    pub fn offset_len(&self) -> u16 {
        match self.form {
            IndexedForm::Offset8 | IndexedForm::PcRelative8 => 1,
            IndexedForm::Offset16 | IndexedForm::PcRelative16 | IndexedForm::ExtendedIndirect => 2,
            _ => 0,
        }
    }

    /// Cycles added on top of the opcode's base count.
    pub fn extra_cycles(&self) -> u32 {
        let base = match self.form {
            IndexedForm::Offset5(_) => 1,
            IndexedForm::PostIncrement1 | IndexedForm::PreDecrement1 => 2,
            IndexedForm::PostIncrement2 | IndexedForm::PreDecrement2 => 3,
            IndexedForm::NoOffset | IndexedForm::Reserved => 0,
            IndexedForm::AccumulatorA | IndexedForm::AccumulatorB => 1,
            IndexedForm::Offset8 | IndexedForm::PcRelative8 => 1,
            IndexedForm::Offset16 | IndexedForm::AccumulatorD => 4,
            IndexedForm::PcRelative16 => 5,
            // Includes the indirection.
            IndexedForm::ExtendedIndirect => return 5,
        };
        if self.indirect { base + 3 } else { base }
    }
}

impl Turbo9 {
    fn index_register_mut(&mut self, register: IndexRegister) -> &mut u16 {
        match register {
            IndexRegister::X => &mut self.x,
            IndexRegister::Y => &mut self.y,
            IndexRegister::U => &mut self.u,
            IndexRegister::S => &mut self.s,
        }
    }

    /// Compute the effective address for `mode` into `ea` and advance PC
    /// past the operand bytes. Returns the addressing-mode extra cycles.
    pub(crate) fn setup_addressing<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        mode: AddressMode,
    ) -> u32 {
        match mode {
            AddressMode::Inherent => {}
            AddressMode::Immediate8 => {
                self.ea = self.pc;
                self.pc = self.pc.wrapping_add(1);
            }
            AddressMode::Immediate16 => {
                self.ea = self.pc;
                self.pc = self.pc.wrapping_add(2);
            }
            AddressMode::Direct => {
                let low = self.fetch_byte(bus);
                self.ea = u16::from_be_bytes([self.dp, low]);
            }
            AddressMode::Extended => {
                self.ea = self.fetch_word(bus);
            }
            AddressMode::Indexed => return self.setup_indexed(bus),
            AddressMode::Relative8 => {
                let offset = self.fetch_byte(bus) as i8;
                self.ea = self.pc.wrapping_add(offset as u16);
            }
            AddressMode::Relative16 => {
                let offset = self.fetch_word(bus);
                self.ea = self.pc.wrapping_add(offset);
            }
        }
        0
    }

    fn setup_indexed<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let postbyte = self.fetch_byte(bus);
        let decoded = IndexedPostbyte::decode(postbyte);
        let base = *self.index_register_mut(decoded.register);

        let address = match decoded.form {
            IndexedForm::Offset5(offset) => base.wrapping_add(offset as u16),
            IndexedForm::PostIncrement1 => {
                *self.index_register_mut(decoded.register) = base.wrapping_add(1);
                base
            }
            IndexedForm::PostIncrement2 => {
                *self.index_register_mut(decoded.register) = base.wrapping_add(2);
                base
            }
            IndexedForm::PreDecrement1 => {
                let address = base.wrapping_sub(1);
                *self.index_register_mut(decoded.register) = address;
                address
            }
            IndexedForm::PreDecrement2 => {
                let address = base.wrapping_sub(2);
                *self.index_register_mut(decoded.register) = address;
                address
            }
            IndexedForm::NoOffset => base,
            IndexedForm::AccumulatorB => base.wrapping_add(self.b as i8 as u16),
            IndexedForm::AccumulatorA => base.wrapping_add(self.a as i8 as u16),
            IndexedForm::AccumulatorD => base.wrapping_add(self.d()),
            IndexedForm::Offset8 => {
                let offset = self.fetch_byte(bus) as i8;
                base.wrapping_add(offset as u16)
            }
            IndexedForm::Offset16 => {
                let offset = self.fetch_word(bus);
                base.wrapping_add(offset)
            }
            IndexedForm::PcRelative8 => {
                let offset = self.fetch_byte(bus) as i8;
                self.pc.wrapping_add(offset as u16)
            }
            IndexedForm::PcRelative16 => {
                let offset = self.fetch_word(bus);
                self.pc.wrapping_add(offset)
            }
            IndexedForm::ExtendedIndirect => self.fetch_word(bus),
            IndexedForm::Reserved => {
                log::warn!(
                    "reserved indexed postbyte ${postbyte:02X} at ${:04X}, using ,{}",
                    self.pc.wrapping_sub(1),
                    decoded.register.name()
                );
                base
            }
        };

        self.ea = if decoded.indirect {
            read_word(bus, address)
        } else {
            address
        };
        decoded.extra_cycles()
    }

    /// Read the 8-bit operand at the effective address.
    #[inline]
    pub(crate) fn read_operand8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &self,
        bus: &mut B,
    ) -> u8 {
        bus.read(BusMaster::Cpu, self.ea)
    }

    /// Read the 16-bit operand at the effective address.
    #[inline]
    pub(crate) fn read_operand16<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &self,
        bus: &mut B,
    ) -> u16 {
        read_word(bus, self.ea)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_bit_offsets_sign_extend() {
        let p = IndexedPostbyte::decode(0x1F);
        assert_eq!(p.register, IndexRegister::X);
        assert_eq!(p.form, IndexedForm::Offset5(-1));
        let p = IndexedPostbyte::decode(0x4F);
        assert_eq!(p.register, IndexRegister::U);
        assert_eq!(p.form, IndexedForm::Offset5(15));
        let p = IndexedPostbyte::decode(0x70);
        assert_eq!(p.register, IndexRegister::S);
        assert_eq!(p.form, IndexedForm::Offset5(-16));
        assert_eq!(p.extra_cycles(), 1);
    }

    #[test]
    fn extended_indirect_is_always_indirect() {
        let p = IndexedPostbyte::decode(0x9F);
        assert_eq!(p.form, IndexedForm::ExtendedIndirect);
        assert!(p.indirect);
        assert_eq!(p.offset_len(), 2);
        assert_eq!(p.extra_cycles(), 5);
    }

    #[test]
    fn indirect_forms_add_three_cycles() {
        // [,X++] and [n16,PCR]
        assert_eq!(IndexedPostbyte::decode(0x91).extra_cycles(), 6);
        assert_eq!(IndexedPostbyte::decode(0x9D).extra_cycles(), 8);
        // ,Y+ and D,U
        assert_eq!(IndexedPostbyte::decode(0xA0).extra_cycles(), 2);
        assert_eq!(IndexedPostbyte::decode(0xCB).extra_cycles(), 4);
    }
}
