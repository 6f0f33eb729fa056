use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::memory::{MemoryBus, WriteAction};

/// Character output port.
pub const CONSOLE_PORT: u16 = 0xFF00;

/// Memory-mapped character output.
///
/// Every CPU write to the port appends the byte, as a character, to a
/// buffer shared with the host. The write is also stored so the port reads
/// back the last character sent.
#[derive(Clone, Default)]
pub struct Console {
    output: Arc<Mutex<String>>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the port's write handler on `bus`.
    pub fn install(&self, bus: &mut MemoryBus) {
        let output = Arc::clone(&self.output);
        bus.add_write_handler(
            CONSOLE_PORT,
            Box::new(move |_, value| {
                output.lock().push(value as char);
                WriteAction::Store
            }),
        );
    }

    /// Everything written since the last `take_output`.
    pub fn output(&self) -> String {
        self.output.lock().clone()
    }

    /// Drain the buffered output.
    pub fn take_output(&self) -> String {
        std::mem::take(&mut *self.output.lock())
    }

    pub fn clear(&self) {
        self.output.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Bus, BusMaster};

    #[test]
    fn cpu_writes_reach_the_buffer() {
        let mut bus = MemoryBus::new();
        let console = Console::new();
        console.install(&mut bus);
        bus.write(BusMaster::Cpu, CONSOLE_PORT, b'O');
        bus.write(BusMaster::Cpu, CONSOLE_PORT, b'K');
        assert_eq!(console.output(), "OK");
        assert_eq!(bus.peek(CONSOLE_PORT), b'K');
        assert_eq!(console.take_output(), "OK");
        assert_eq!(console.output(), "");
    }

    #[test]
    fn debugger_writes_are_silent() {
        let mut bus = MemoryBus::new();
        let console = Console::new();
        console.install(&mut bus);
        bus.write(BusMaster::Debugger, CONSOLE_PORT, b'X');
        assert!(console.output().is_empty());
    }
}
