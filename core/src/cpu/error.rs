use std::fmt;

use crate::cpu::turbo9::Register;

/// Failures surfaced by `Turbo9::step`.
///
/// A failing step has no architectural effect: the register file is rolled
/// back to its pre-instruction value, so the machine stays paused at the
/// faulting instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// TFR/EXG between registers of different widths.
    MismatchedRegisters {
        source: Register,
        destination: Register,
    },
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::MismatchedRegisters {
                source,
                destination,
            } => write!(
                f,
                "mismatched register types: {source} ({}-bit) and {destination} ({}-bit)",
                source.width_bits(),
                destination.width_bits()
            ),
        }
    }
}

impl std::error::Error for CpuError {}
