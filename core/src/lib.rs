pub mod core;
pub mod cpu;
pub mod device;
pub mod disasm;
pub mod machine;

pub mod prelude {
    pub use crate::core::{Bus, BusMaster, InterruptLine, MemoryBus};
    pub use crate::cpu::{CpuError, CpuStateTrait, Turbo9, Turbo9State};
    pub use crate::disasm::{Disassembler, LoadError, Operation, SymbolTable};
    pub use crate::machine::{Hyper9, RunController, RunOptions, StopReason};
}
