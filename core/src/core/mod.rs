pub mod bus;
pub mod memory;

pub use bus::{Bus, BusMaster, InterruptLine, InterruptState, LineRequest};
pub use memory::{IoContext, MemoryBus, PeekBus, WriteAction};
