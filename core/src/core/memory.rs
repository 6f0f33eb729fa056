//! 64KB memory bus with memory-mapped I/O handlers.
//!
//! The bus keeps two images: the working memory the CPU executes against and
//! the original image captured at load time, so a reset can restore the
//! as-loaded program without reading it from disk again.

use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;

use super::bus::{Bus, BusMaster, InterruptLine, LineRequest};

/// Size of the addressable space.
pub const MEMORY_SIZE: usize = 0x10000;

/// What the bus does with a written byte after the write handler ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteAction {
    /// Store the byte in memory as a plain RAM write would.
    Store,
    /// The handler consumed the write; memory is left as the handler left it.
    Discard,
}

/// Handler invoked when the CPU writes to its address.
pub type WriteHandler = Box<dyn FnMut(&mut IoContext<'_>, u8) -> WriteAction + Send>;

/// Handler invoked when the CPU reads its address. Receives the stored byte
/// and returns the byte the CPU observes.
pub type ReadHandler = Box<dyn FnMut(&mut IoContext<'_>, u8) -> u8 + Send>;

/// What an I/O handler may touch while it runs: the memory cells and the
/// interrupt request queue. Handlers cannot reach the handler registry, so
/// they cannot install new handlers from inside a bus access.
pub struct IoContext<'a> {
    memory: &'a mut [u8],
    requests: &'a mut VecDeque<LineRequest>,
}

impl IoContext<'_> {
    pub fn peek(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    pub fn poke(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    pub fn assert_line(&mut self, line: InterruptLine) {
        self.requests.push_back(LineRequest::Assert(line));
    }

    pub fn deassert_line(&mut self, line: InterruptLine) {
        self.requests.push_back(LineRequest::Deassert(line));
    }
}

pub struct MemoryBus {
    memory: Vec<u8>,
    original: Vec<u8>,
    write_handlers: HashMap<u16, WriteHandler>,
    read_handlers: HashMap<u16, ReadHandler>,
    line_requests: VecDeque<LineRequest>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE],
            original: vec![0; MEMORY_SIZE],
            write_handlers: HashMap::new(),
            read_handlers: HashMap::new(),
            line_requests: VecDeque::new(),
        }
    }

    /// Replace both images with a zeroed space holding `image` at
    /// `load_address`. Bytes that would run past $FFFF are dropped.
    pub fn load_image(&mut self, image: &[u8], load_address: u16) {
        let start = load_address as usize;
        let len = image.len().min(MEMORY_SIZE - start);
        self.memory.fill(0);
        self.memory[start..start + len].copy_from_slice(&image[..len]);
        self.original.copy_from_slice(&self.memory);
    }

    /// Capture the working memory as the original image.
    pub fn capture_original(&mut self) {
        self.original.copy_from_slice(&self.memory);
    }

    /// Restore the working memory from the original image. Handlers stay
    /// installed; pending line requests are dropped.
    pub fn reset(&mut self) {
        self.memory.copy_from_slice(&self.original);
        self.line_requests.clear();
    }

    /// Register the write handler for `addr`. A later registration for the
    /// same address replaces the earlier one.
    pub fn add_write_handler(&mut self, addr: u16, handler: WriteHandler) {
        if self.write_handlers.insert(addr, handler).is_some() {
            log::debug!("replaced write handler at ${addr:04X}");
        }
    }

    /// Register the read handler for `addr`, replacing any earlier one.
    pub fn add_read_handler(&mut self, addr: u16, handler: ReadHandler) {
        if self.read_handlers.insert(addr, handler).is_some() {
            log::debug!("replaced read handler at ${addr:04X}");
        }
    }

    /// Queue an interrupt line change from outside a bus access, e.g. a
    /// host-driven timer. The CPU applies it at the start of its next step.
    pub fn request_line(&mut self, request: LineRequest) {
        self.line_requests.push_back(request);
    }

    pub fn has_handler(&self, addr: u16) -> bool {
        self.write_handlers.contains_key(&addr) || self.read_handlers.contains_key(&addr)
    }

    /// Passive read: never runs a handler.
    pub fn peek(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    /// Passive big-endian word read.
    pub fn peek_word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.peek(addr), self.peek(addr.wrapping_add(1))])
    }

    /// Passive write to the working image: never runs a handler.
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    pub fn poke_word(&mut self, addr: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.poke(addr, hi);
        self.poke(addr.wrapping_add(1), lo);
    }

    /// The original (as-loaded) byte at `addr`.
    pub fn original(&self, addr: u16) -> u8 {
        self.original[addr as usize]
    }

    /// Render `count` bytes starting at `address`, 16 per line, with an
    /// ASCII column. The dump stops at the top of memory.
    pub fn ram_dump(&self, address: u16, count: usize) -> String {
        let start = address as usize;
        let end = start.saturating_add(count).min(MEMORY_SIZE);
        let mut out = String::new();
        let mut line_start = start;
        while line_start < end {
            let line_end = (line_start + 16).min(end);
            let bytes = &self.memory[line_start..line_end];
            let _ = write!(out, "{line_start:04X}:");
            for byte in bytes {
                let _ = write!(out, " {byte:02X}");
            }
            for _ in bytes.len()..16 {
                out.push_str("   ");
            }
            out.push_str("  |");
            for &byte in bytes {
                out.push(if byte.is_ascii_graphic() || byte == b' ' {
                    byte as char
                } else {
                    '.'
                });
            }
            out.push_str("|\n");
            line_start = line_end;
        }
        out
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for MemoryBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, master: BusMaster, addr: u16) -> u8 {
        let stored = self.memory[addr as usize];
        if master == BusMaster::Debugger {
            return stored;
        }
        match self.read_handlers.get_mut(&addr) {
            Some(handler) => {
                let mut ctx = IoContext {
                    memory: &mut self.memory,
                    requests: &mut self.line_requests,
                };
                handler(&mut ctx, stored)
            }
            None => stored,
        }
    }

    fn write(&mut self, master: BusMaster, addr: u16, data: u8) {
        if master == BusMaster::Cpu
            && let Some(handler) = self.write_handlers.get_mut(&addr)
        {
            let mut ctx = IoContext {
                memory: &mut self.memory,
                requests: &mut self.line_requests,
            };
            if handler(&mut ctx, data) == WriteAction::Discard {
                return;
            }
        }
        self.memory[addr as usize] = data;
    }

    fn next_line_request(&mut self) -> Option<LineRequest> {
        self.line_requests.pop_front()
    }
}

/// Read-only view used for side-effect-free decoding. Reads are passive and
/// writes are dropped.
pub struct PeekBus<'a>(pub &'a MemoryBus);

impl Bus for PeekBus<'_> {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.0.peek(addr)
    }

    fn write(&mut self, _master: BusMaster, addr: u16, _data: u8) {
        log::debug!("dropped write to ${addr:04X} through a read-only bus view");
    }
}
