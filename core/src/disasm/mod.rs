//! Disassembler and stepping front for a Turbo9 machine.
//!
//! The disassembler owns the CPU and its memory bus. Decoding for display
//! runs the same fetch and addressing-mode setup as the engine, but on a
//! copy of the register file over a read-only view of memory, so peeking at
//! instructions can never change the machine.

pub mod operation;
pub mod symbols;

use std::fmt;
use std::path::Path;

use crate::core::memory::{MEMORY_SIZE, MemoryBus, PeekBus};
use crate::cpu::turbo9::{
    AddressMode, IndexedPostbyte, Instruction, SWI_VECTOR, SWI2_VECTOR, SWI3_VECTOR,
    FIRQ_VECTOR, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR, Turbo9,
};
use crate::cpu::{CpuError, CpuStateTrait, Turbo9State};

pub use operation::{Operand, Operation, PostOperand};
pub use symbols::{Symbol, SymbolTable};

/// Default window length for `check_disassembly`.
pub const DEFAULT_WINDOW: usize = 30;

/// Instruction text is padded (or cut) to this width before the register
/// dump in a trace line.
pub const TRACE_PAD: usize = 60;

/// Vector contents of a blank machine.
pub const DEFAULT_VECTORS: [(u16, u16); 7] = [
    (SWI3_VECTOR, 0x0100),
    (SWI2_VECTOR, 0x0103),
    (FIRQ_VECTOR, 0x010F),
    (IRQ_VECTOR, 0x010C),
    (SWI_VECTOR, 0x0106),
    (NMI_VECTOR, 0x0109),
    (RESET_VECTOR, 0x0000),
];

/// Receives one formatted trace line per executed instruction.
pub type TraceSink = Box<dyn FnMut(&str) + Send>;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    EmptyImage,
    ImageTooLarge(usize),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "I/O error: {e}"),
            LoadError::EmptyImage => write!(f, "image is empty"),
            LoadError::ImageTooLarge(len) => {
                write!(f, "image is {len} bytes, larger than the 64K address space")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

pub struct Disassembler {
    cpu: Turbo9,
    bus: MemoryBus,
    symbols: SymbolTable,
    operations: Vec<Operation>,
    trace: Option<TraceSink>,
    logging: bool,
}

impl Disassembler {
    /// A blank machine: zeroed memory holding the default vectors, reset.
    pub fn new() -> Self {
        let mut bus = MemoryBus::new();
        for (vector, target) in DEFAULT_VECTORS {
            bus.poke_word(vector, target);
        }
        bus.capture_original();
        let mut cpu = Turbo9::new();
        cpu.reset(&mut bus);
        Self {
            cpu,
            bus,
            symbols: SymbolTable::new(),
            operations: Vec::new(),
            trace: None,
            logging: true,
        }
    }

    pub fn cpu(&self) -> &Turbo9 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Turbo9 {
        &mut self.cpu
    }

    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut MemoryBus {
        &mut self.bus
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn set_symbols(&mut self, symbols: SymbolTable) {
        self.symbols = symbols;
        self.operations.clear();
    }

    /// Install (or remove) the trace line receiver. Without one, trace lines
    /// go to the `trace` log level.
    pub fn set_trace(&mut self, sink: Option<TraceSink>) {
        self.trace = sink;
    }

    pub fn set_logging(&mut self, logging: bool) {
        self.logging = logging;
    }

    /// Install `image` at the top of the address space and reset. The
    /// machine is untouched if the image is rejected.
    pub fn load(&mut self, image: &[u8]) -> Result<(), LoadError> {
        if image.is_empty() {
            return Err(LoadError::EmptyImage);
        }
        if image.len() > MEMORY_SIZE {
            return Err(LoadError::ImageTooLarge(image.len()));
        }
        let load_address = (MEMORY_SIZE - image.len()) as u16;
        self.bus.load_image(image, load_address);
        log::debug!(
            "loaded {} bytes at ${load_address:04X}",
            image.len()
        );
        self.reset();
        Ok(())
    }

    /// Load an image file and its companion `.map` symbol file.
    pub fn load_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let image = std::fs::read(path)?;
        let symbols = SymbolTable::from_file(&path.with_extension("map"));
        self.load(&image)?;
        self.set_symbols(symbols);
        Ok(())
    }

    /// Restore memory to the as-loaded image and reset the CPU.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        self.operations.clear();
    }

    /// Execute one instruction (or service an interrupt) and return the
    /// instruction that was at PC beforehand. Nothing is returned while the
    /// CPU waits in SYNC/CWAI.
    pub fn step(&mut self) -> Result<Option<Operation>, CpuError> {
        let was_waiting = self.cpu.is_waiting();
        let operation = if was_waiting {
            None
        } else {
            Some(self.disassemble(self.cpu.pc))
        };

        self.cpu.step(&mut self.bus)?;

        let now_waiting = self.cpu.is_waiting();
        if self.logging && (!now_waiting || was_waiting != now_waiting) {
            let text = operation.as_ref().map(Operation::as_code).unwrap_or_default();
            let line = self.trace_line(&text);
            match self.trace.as_mut() {
                Some(sink) => sink(&line),
                None => log::trace!("{line}"),
            }
        }
        Ok(operation)
    }

    fn trace_line(&self, text: &str) -> String {
        let text: String = text.chars().take(TRACE_PAD).collect();
        format!("{text:<TRACE_PAD$}{}", self.cpu.register_line())
    }

    /// Decode the instruction at `pc` without touching the machine.
    pub fn disassemble(&self, pc: u16) -> Operation {
        let mut cpu = self.cpu.clone();
        let mut bus = PeekBus(&self.bus);
        cpu.pc = pc;

        let (page, opcode_byte, entry) = cpu.fetch_opcode(&mut bus);
        let (instruction, mode) = match entry {
            Some(op) => (op.instruction, op.mode),
            None => (Instruction::Illegal, AddressMode::Inherent),
        };
        let operand_start = cpu.pc;
        cpu.setup_addressing(&mut bus, mode);
        let operand = self.decode_operand(mode, operand_start);
        let post_operand = match operand {
            Operand::Indexed(postbyte) => {
                let offset_at = operand_start.wrapping_add(1);
                match IndexedPostbyte::decode(postbyte).offset_len() {
                    1 => PostOperand::Byte(self.bus.peek(offset_at)),
                    2 => PostOperand::Word(self.bus.peek_word(offset_at)),
                    _ => PostOperand::None,
                }
            }
            _ => PostOperand::None,
        };

        let mut end = cpu.pc;
        let os9_call = if instruction == Instruction::Swi2 {
            let call = self.bus.peek(end);
            end = end.wrapping_add(1);
            Some(call)
        } else {
            None
        };

        let size = end.wrapping_sub(pc);
        let bytes = (0..size).map(|i| self.bus.peek(pc.wrapping_add(i))).collect();
        let mut operation = Operation {
            label: self.symbols.lookup(pc).unwrap_or_default().to_string(),
            offset: pc,
            page,
            opcode: opcode_byte,
            instruction,
            mode,
            operand,
            post_operand,
            size,
            bytes,
            os9_call,
            target_label: String::new(),
        };
        if let Some(target) = operation.branch_target() {
            operation.target_label = self.symbols.lookup(target).unwrap_or_default().to_string();
        }
        operation
    }

    fn decode_operand(&self, mode: AddressMode, at: u16) -> Operand {
        match mode {
            AddressMode::Inherent => Operand::None,
            AddressMode::Immediate8 => Operand::Immediate8(self.bus.peek(at)),
            AddressMode::Immediate16 => Operand::Immediate16(self.bus.peek_word(at)),
            AddressMode::Direct => Operand::Direct(self.bus.peek(at)),
            AddressMode::Extended => Operand::Extended(self.bus.peek_word(at)),
            AddressMode::Indexed => Operand::Indexed(self.bus.peek(at)),
            AddressMode::Relative8 => Operand::Relative8(self.bus.peek(at)),
            AddressMode::Relative16 => Operand::Relative16(self.bus.peek_word(at)),
        }
    }

    /// Decode `count` consecutive instructions from `start`. Stops early
    /// only when the listing would run past the top of memory.
    pub fn disassemble_range(&self, start: u16, count: usize) -> Vec<Operation> {
        let mut operations = Vec::with_capacity(count);
        let mut pc = start as usize;
        while operations.len() < count && pc < MEMORY_SIZE {
            let operation = self.disassemble(pc as u16);
            pc += operation.size as usize;
            operations.push(operation);
        }
        operations
    }

    /// The cached listing window, recomputed from PC whenever PC leaves
    /// `[first.offset, last.offset]`.
    pub fn check_disassembly(&mut self, count: usize) -> &[Operation] {
        let pc = self.cpu.pc;
        let stale = match (self.operations.first(), self.operations.last()) {
            (Some(first), Some(last)) => pc < first.offset || pc > last.offset,
            _ => true,
        };
        if stale {
            self.operations = self.disassemble_range(pc, count);
        }
        &self.operations
    }

    pub fn dump_memory(&self, address: u16, count: usize) -> String {
        self.bus.ram_dump(address, count)
    }

    pub fn registers(&self) -> String {
        self.cpu.registers()
    }

    pub fn snapshot(&self) -> Turbo9State {
        self.cpu.snapshot()
    }

    pub fn assert_irq(&mut self) {
        self.cpu.assert_irq();
    }

    pub fn assert_firq(&mut self) {
        self.cpu.assert_firq();
    }

    pub fn assert_nmi(&mut self) {
        self.cpu.assert_nmi();
    }

    pub fn deassert_irq(&mut self) {
        self.cpu.deassert_irq();
    }

    pub fn deassert_firq(&mut self) {
        self.cpu.deassert_firq();
    }

    pub fn deassert_nmi(&mut self) {
        self.cpu.deassert_nmi();
    }
}

impl Default for Disassembler {
    fn default() -> Self {
        Self::new()
    }
}
