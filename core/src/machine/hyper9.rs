use std::path::Path;

use crate::cpu::CpuError;
use crate::device::{Console, Timer};
use crate::disasm::{Disassembler, LoadError, Operation};

/// Instructions between checks of an external stop request.
pub const STOP_CHECK_INTERVAL: u64 = 1024;

/// Why a run loop returned control to its caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// PC reached this breakpoint address.
    Breakpoint(u16),
    /// The instruction limit was reached.
    Limit,
    /// An instruction failed; the machine is paused on it.
    Fault(CpuError),
    /// The caller asked the loop to stop.
    Requested,
}

/// Result of a run loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub reason: StopReason,
    /// Steps executed by this run, including interrupt entries and wait
    /// cycles.
    pub instructions: u64,
}

/// The Hyper9 host: a Turbo9 with a character output port and an interval
/// timer wired to IRQ.
pub struct Hyper9 {
    disasm: Disassembler,
    console: Console,
    timer: Timer,
    timer_ticking: bool,
}

impl Hyper9 {
    pub fn new(cycles_per_tick: u64) -> Self {
        let mut disasm = Disassembler::new();
        let console = Console::new();
        let timer = Timer::new(cycles_per_tick);
        console.install(disasm.bus_mut());
        timer.install(disasm.bus_mut());
        Self {
            disasm,
            console,
            timer,
            timer_ticking: true,
        }
    }

    pub fn disassembler(&self) -> &Disassembler {
        &self.disasm
    }

    pub fn disassembler_mut(&mut self) -> &mut Disassembler {
        &mut self.disasm
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Whether executed cycles drive the timer. When off, the timer only
    /// fires through `fire_timer`.
    pub fn set_timer_ticking(&mut self, ticking: bool) {
        self.timer_ticking = ticking;
    }

    pub fn load(&mut self, image: &[u8]) -> Result<(), LoadError> {
        self.disasm.load(image)?;
        self.reset_devices();
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), LoadError> {
        self.disasm.load_file(path)?;
        self.reset_devices();
        log::info!(
            "loaded {} ({} symbols)",
            path.display(),
            self.disasm.symbols().len()
        );
        Ok(())
    }

    pub fn reset(&mut self) {
        self.disasm.reset();
        self.reset_devices();
    }

    fn reset_devices(&mut self) {
        self.timer.reset();
        self.console.clear();
    }

    pub fn pc(&self) -> u16 {
        self.disasm.cpu().pc
    }

    pub fn fire_timer(&mut self) {
        self.timer.fire(self.disasm.bus_mut());
    }

    /// Execute one instruction and let the timer see the cycles it took.
    pub fn step(&mut self) -> Result<Option<Operation>, CpuError> {
        let before = self.disasm.cpu().cycles;
        let operation = self.disasm.step()?;
        if self.timer_ticking {
            let elapsed = self.disasm.cpu().cycles - before;
            self.timer.advance(self.disasm.bus_mut(), elapsed);
        }
        Ok(operation)
    }

    /// Run until a breakpoint, the instruction limit, a fault, or until
    /// `stop_requested` returns true. The stop check runs every
    /// `STOP_CHECK_INTERVAL` instructions. Breakpoints are checked after
    /// each step, so a run started on a breakpoint leaves it.
    pub fn run_until<F: FnMut() -> bool>(
        &mut self,
        limit: Option<u64>,
        breakpoints: &[u16],
        mut stop_requested: F,
    ) -> RunOutcome {
        let mut instructions = 0;
        let reason = loop {
            if limit.is_some_and(|limit| instructions >= limit) {
                break StopReason::Limit;
            }
            if instructions % STOP_CHECK_INTERVAL == 0 && instructions != 0 && stop_requested() {
                break StopReason::Requested;
            }
            if let Err(err) = self.step() {
                log::warn!("fault at ${:04X}: {err}", self.pc());
                break StopReason::Fault(err);
            }
            instructions += 1;
            let pc = self.pc();
            if !self.disasm.cpu().is_waiting() && breakpoints.contains(&pc) {
                break StopReason::Breakpoint(pc);
            }
        };
        log::debug!("run stopped after {instructions} instructions: {reason:?}");
        RunOutcome {
            reason,
            instructions,
        }
    }

    pub fn run(&mut self, limit: Option<u64>, breakpoints: &[u16]) -> RunOutcome {
        self.run_until(limit, breakpoints, || false)
    }

    /// Step over a subroutine call: if the next instruction is BSR, LBSR
    /// or JSR, run until control comes back to the instruction after it.
    /// Any other instruction is a single step.
    pub fn step_over(&mut self, limit: Option<u64>, breakpoints: &[u16]) -> RunOutcome {
        let next = self.disasm.disassemble(self.pc());
        if self.disasm.cpu().is_waiting() || !next.is_subroutine_call() {
            return self.run(Some(1), &[]);
        }
        let mut stops = breakpoints.to_vec();
        stops.push(next.next_offset());
        self.run(limit, &stops)
    }
}

impl Default for Hyper9 {
    fn default() -> Self {
        Self::new(crate::device::timer::DEFAULT_CYCLES_PER_TICK)
    }
}
