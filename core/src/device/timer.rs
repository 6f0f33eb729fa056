use crate::core::bus::{InterruptLine, LineRequest};
use crate::core::memory::{MemoryBus, WriteAction};

/// Timer status register. Bit 0 reads 1 once the timer has fired.
pub const TIMER_STATUS: u16 = 0xFF02;
/// Timer control register. Bit 0 enables periodic firing routed to IRQ.
pub const TIMER_CONTROL: u16 = 0xFF03;

const FIRED: u8 = 0x01;
const ENABLE: u8 = 0x01;

/// Default timer period in CPU cycles.
pub const DEFAULT_CYCLES_PER_TICK: u64 = 1000;

/// Periodic interval timer.
///
/// Both registers live in ordinary memory cells; the timer only adds
/// behaviour to CPU writes. Writing 1 to status bit 0 acknowledges the
/// interrupt: the bit is cleared and IRQ is dropped. The host drives time
/// forward with `advance`, which fires once per `cycles_per_tick` cycles
/// while the control enable bit is set.
#[derive(Clone, Debug)]
pub struct Timer {
    cycles_per_tick: u64,
    elapsed: u64,
    fired: u64,
}

impl Timer {
    pub fn new(cycles_per_tick: u64) -> Self {
        Self {
            cycles_per_tick: cycles_per_tick.max(1),
            elapsed: 0,
            fired: 0,
        }
    }

    pub fn cycles_per_tick(&self) -> u64 {
        self.cycles_per_tick
    }

    /// Number of times the timer has fired since the last reset.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.fired = 0;
    }

    /// Register the status and control write handlers on `bus`.
    pub fn install(&self, bus: &mut MemoryBus) {
        bus.add_write_handler(
            TIMER_STATUS,
            Box::new(|ctx, value| {
                if value & FIRED == 0 {
                    return WriteAction::Discard;
                }
                let status = ctx.peek(TIMER_STATUS);
                ctx.poke(TIMER_STATUS, status & !FIRED);
                ctx.deassert_line(InterruptLine::Irq);
                WriteAction::Discard
            }),
        );
        bus.add_write_handler(
            TIMER_CONTROL,
            Box::new(|_, value| {
                log::debug!(
                    "timer {}",
                    if value & ENABLE != 0 { "enabled" } else { "disabled" }
                );
                WriteAction::Store
            }),
        );
    }

    pub fn is_enabled(&self, bus: &MemoryBus) -> bool {
        bus.peek(TIMER_CONTROL) & ENABLE != 0
    }

    /// Set the fired bit and raise IRQ if the control register routes the
    /// timer to it.
    pub fn fire(&mut self, bus: &mut MemoryBus) {
        bus.poke(TIMER_STATUS, bus.peek(TIMER_STATUS) | FIRED);
        self.fired += 1;
        if self.is_enabled(bus) {
            bus.request_line(LineRequest::Assert(InterruptLine::Irq));
        }
    }

    /// Account `cycles` of CPU time. Returns true if the timer fired.
    pub fn advance(&mut self, bus: &mut MemoryBus, cycles: u64) -> bool {
        if !self.is_enabled(bus) {
            self.elapsed = 0;
            return false;
        }
        self.elapsed += cycles;
        if self.elapsed < self.cycles_per_tick {
            return false;
        }
        self.elapsed %= self.cycles_per_tick;
        self.fire(bus);
        true
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(DEFAULT_CYCLES_PER_TICK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Bus, BusMaster};

    #[test]
    fn fire_sets_status_and_requests_irq_when_enabled() {
        let mut bus = MemoryBus::new();
        let mut timer = Timer::default();
        timer.install(&mut bus);

        timer.fire(&mut bus);
        assert_eq!(bus.peek(TIMER_STATUS) & FIRED, FIRED);
        assert_eq!(bus.next_line_request(), None);

        bus.write(BusMaster::Cpu, TIMER_CONTROL, ENABLE);
        timer.fire(&mut bus);
        assert_eq!(
            bus.next_line_request(),
            Some(LineRequest::Assert(InterruptLine::Irq))
        );
    }

    #[test]
    fn acknowledge_clears_status_and_drops_irq() {
        let mut bus = MemoryBus::new();
        let mut timer = Timer::default();
        timer.install(&mut bus);
        timer.fire(&mut bus);

        bus.write(BusMaster::Cpu, TIMER_STATUS, 0x00);
        assert_eq!(bus.peek(TIMER_STATUS), FIRED);

        bus.write(BusMaster::Cpu, TIMER_STATUS, FIRED);
        assert_eq!(bus.peek(TIMER_STATUS), 0x00);
        assert_eq!(
            bus.next_line_request(),
            Some(LineRequest::Deassert(InterruptLine::Irq))
        );
    }

    #[test]
    fn advance_fires_once_per_period() {
        let mut bus = MemoryBus::new();
        let mut timer = Timer::new(100);
        timer.install(&mut bus);

        assert!(!timer.advance(&mut bus, 500));
        bus.write(BusMaster::Cpu, TIMER_CONTROL, ENABLE);
        assert!(!timer.advance(&mut bus, 60));
        assert!(timer.advance(&mut bus, 60));
        assert!(!timer.advance(&mut bus, 60));
        assert_eq!(timer.fired(), 1);
    }
}
