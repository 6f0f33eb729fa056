use std::fmt;

use super::Turbo9;
use crate::core::Bus;
use crate::cpu::error::CpuError;

/// Registers addressable by TFR/EXG postbyte nibbles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    D,
    X,
    Y,
    U,
    S,
    Pc,
    A,
    B,
    Cc,
    Dp,
}

impl Register {
    /// Decode a 4-bit register selector. Codes 6, 7 and 12-15 are reserved.
    pub fn from_code(code: u8) -> Option<Register> {
        match code {
            0x0 => Some(Register::D),
            0x1 => Some(Register::X),
            0x2 => Some(Register::Y),
            0x3 => Some(Register::U),
            0x4 => Some(Register::S),
            0x5 => Some(Register::Pc),
            0x8 => Some(Register::A),
            0x9 => Some(Register::B),
            0xA => Some(Register::Cc),
            0xB => Some(Register::Dp),
            _ => None,
        }
    }

    pub fn is_16bit(self) -> bool {
        matches!(
            self,
            Register::D | Register::X | Register::Y | Register::U | Register::S | Register::Pc
        )
    }

    pub fn width_bits(self) -> u8 {
        if self.is_16bit() { 16 } else { 8 }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::D => "D",
            Register::X => "X",
            Register::Y => "Y",
            Register::U => "U",
            Register::S => "S",
            Register::Pc => "PC",
            Register::A => "A",
            Register::B => "B",
            Register::Cc => "CC",
            Register::Dp => "DP",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Turbo9 {
    pub fn register_value(&self, register: Register) -> u16 {
        match register {
            Register::D => self.d(),
            Register::X => self.x,
            Register::Y => self.y,
            Register::U => self.u,
            Register::S => self.s,
            Register::Pc => self.pc,
            Register::A => self.a as u16,
            Register::B => self.b as u16,
            Register::Cc => self.cc as u16,
            Register::Dp => self.dp as u16,
        }
    }

    pub fn set_register_value(&mut self, register: Register, val: u16) {
        match register {
            Register::D => self.set_d(val),
            Register::X => self.x = val,
            Register::Y => self.y = val,
            Register::U => self.u = val,
            Register::S => self.s = val,
            Register::Pc => self.pc = val,
            Register::A => self.a = val as u8,
            Register::B => self.b = val as u8,
            Register::Cc => self.cc = val as u8,
            Register::Dp => self.dp = val as u8,
        }
    }

    /// Reserved selector codes fall back to D.
    fn transfer_register(&self, code: u8) -> Register {
        Register::from_code(code).unwrap_or_else(|| {
            log::warn!(
                "reserved register code {code:#X} in TFR/EXG at ${:04X}, using D",
                self.pc
            );
            Register::D
        })
    }

    /// Decode the TFR/EXG postbyte into (source, destination) and check the
    /// widths match.
    fn transfer_pair<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> Result<(Register, Register), CpuError> {
        let postbyte = self.read_operand8(bus);
        let source = self.transfer_register(postbyte >> 4);
        let destination = self.transfer_register(postbyte & 0x0F);
        if source.is_16bit() != destination.is_16bit() {
            return Err(CpuError::MismatchedRegisters {
                source,
                destination,
            });
        }
        Ok((source, destination))
    }

    /// TFR r1,r2: copy r1 into r2.
    pub(crate) fn op_tfr<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> Result<u32, CpuError> {
        let (source, destination) = self.transfer_pair(bus)?;
        let val = self.register_value(source);
        self.set_register_value(destination, val);
        Ok(0)
    }

    /// EXG r1,r2: swap r1 and r2.
    pub(crate) fn op_exg<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> Result<u32, CpuError> {
        let (first, second) = self.transfer_pair(bus)?;
        let first_val = self.register_value(first);
        let second_val = self.register_value(second);
        self.set_register_value(first, second_val);
        self.set_register_value(second, first_val);
        Ok(0)
    }
}
