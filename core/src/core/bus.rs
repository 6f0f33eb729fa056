/// Identifies who is accessing the bus.
///
/// The CPU sees memory-mapped I/O: its reads go through installed read
/// handlers and its writes fire write handlers. The debugger inspects and
/// patches memory passively, so disassembly and memory views never trigger
/// peripheral side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusMaster {
    Cpu,
    Debugger,
}

/// Generic bus interface.
pub trait Bus {
    type Address: Copy;
    type Data: Copy;

    fn read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data;
    fn write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data);

    /// Called once per CPU step before interrupt admission. Hook point for
    /// peripherals that need a per-step refresh; the default does nothing.
    fn refresh(&mut self) {}

    /// Pops the next interrupt line change requested by a peripheral.
    /// The CPU drains these at the start of every step.
    fn next_line_request(&mut self) -> Option<LineRequest> {
        None
    }
}

/// The three asynchronous interrupt inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterruptLine {
    Nmi,
    Irq,
    Firq,
}

/// A peripheral's request to raise or drop an interrupt line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineRequest {
    Assert(InterruptLine),
    Deassert(InterruptLine),
}

/// Latched interrupt request lines.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterruptState {
    pub nmi: bool,
    pub irq: bool,
    pub firq: bool,
}

impl InterruptState {
    pub fn set(&mut self, line: InterruptLine, asserted: bool) {
        match line {
            InterruptLine::Nmi => self.nmi = asserted,
            InterruptLine::Irq => self.irq = asserted,
            InterruptLine::Firq => self.firq = asserted,
        }
    }

    pub fn is_set(&self, line: InterruptLine) -> bool {
        match line {
            InterruptLine::Nmi => self.nmi,
            InterruptLine::Irq => self.irq,
            InterruptLine::Firq => self.firq,
        }
    }

    pub fn any(&self) -> bool {
        self.nmi || self.irq || self.firq
    }

    pub fn apply(&mut self, request: LineRequest) {
        match request {
            LineRequest::Assert(line) => self.set(line, true),
            LineRequest::Deassert(line) => self.set(line, false),
        }
    }
}
