mod addressing;
mod alu;
mod branch;
mod load_store;
pub mod opcodes;
mod stack;
mod transfer;

use std::fmt::Write as _;

use crate::core::{Bus, BusMaster, InterruptLine, InterruptState};
use crate::cpu::{
    error::CpuError,
    state::{CpuStateTrait, Turbo9State},
};

pub use addressing::{IndexRegister, IndexedForm, IndexedPostbyte};
pub use opcodes::{AddressMode, Instruction, Opcode, Page};
pub use transfer::Register;

pub const SWI3_VECTOR: u16 = 0xFFF2;
pub const SWI2_VECTOR: u16 = 0xFFF4;
pub const FIRQ_VECTOR: u16 = 0xFFF6;
pub const IRQ_VECTOR: u16 = 0xFFF8;
pub const SWI_VECTOR: u16 = 0xFFFA;
pub const NMI_VECTOR: u16 = 0xFFFC;
pub const RESET_VECTOR: u16 = 0xFFFE;

/// System stack pointer after reset.
pub const RESET_STACK: u16 = 0x0500;

/// Entry cost of an interrupt that stacks the entire machine state.
const ENTIRE_ENTRY_CYCLES: u32 = 19;
/// Entry cost of a FIRQ (PC and CC only).
const FAST_ENTRY_CYCLES: u32 = 10;
/// Entry cost when CWAI already stacked the state: only the vector fetch.
const PRESTACKED_ENTRY_CYCLES: u32 = 7;

/// Table entry used for undefined opcodes.
const ILLEGAL: Opcode = Opcode {
    instruction: Instruction::Illegal,
    mode: AddressMode::Inherent,
    cycles: 2,
};

#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum CcFlag {
    C = 0x01, // Carry
    V = 0x02, // Overflow
    Z = 0x04, // Zero
    N = 0x08, // Negative
    I = 0x10, // IRQ mask
    H = 0x20, // Half carry
    F = 0x40, // FIRQ mask
    E = 0x80, // Entire
}

/// Wait-for-interrupt state entered by SYNC and CWAI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecState {
    Running,
    /// SYNC: released by any interrupt request, masked or not.
    SyncWait,
    /// CWAI: machine state is already on the stack.
    CwaiWait,
}

#[derive(Clone, Debug)]
pub struct Turbo9 {
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub x: u16,
    pub y: u16,
    pub u: u16,
    pub s: u16,
    pub pc: u16,
    pub cc: u8,

    pub instructions_executed: u64,
    pub cycles: u64,
    pub interrupts_received: u64,

    pub(crate) interrupts: InterruptState,
    pub(crate) state: ExecState,
    /// Effective address computed by the addressing-mode setup.
    pub(crate) ea: u16,
}

impl Turbo9 {
    pub fn new() -> Self {
        Self {
            a: 0,
            b: 0,
            dp: 0,
            x: 0,
            y: 0,
            u: 0,
            s: 0,
            pc: 0,
            cc: 0,
            instructions_executed: 0,
            cycles: 0,
            interrupts_received: 0,
            interrupts: InterruptState::default(),
            state: ExecState::Running,
            ea: 0,
        }
    }

    pub fn d(&self) -> u16 {
        u16::from_be_bytes([self.a, self.b])
    }

    pub fn set_d(&mut self, val: u16) {
        let bytes = val.to_be_bytes();
        self.a = bytes[0];
        self.b = bytes[1];
    }

    #[inline]
    pub fn set_flag(&mut self, flag: CcFlag, set: bool) {
        if set {
            self.cc |= flag as u8
        } else {
            self.cc &= !(flag as u8)
        }
    }

    #[inline]
    pub fn flag(&self, flag: CcFlag) -> bool {
        self.cc & flag as u8 != 0
    }

    pub fn exec_state(&self) -> ExecState {
        self.state
    }

    /// True while SYNC or CWAI is waiting for an interrupt.
    pub fn is_waiting(&self) -> bool {
        self.state != ExecState::Running
    }

    pub fn interrupts(&self) -> InterruptState {
        self.interrupts
    }

    /// Reinitialize registers and counters and load PC from the reset
    /// vector. Callers that own the memory image restore it first so the
    /// vector is read from the as-loaded program.
    pub fn reset<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, bus: &mut B) {
        self.a = 0;
        self.b = 0;
        self.dp = 0;
        self.x = 0;
        self.y = 0;
        self.u = 0;
        self.s = RESET_STACK;
        self.cc = CcFlag::I as u8 | CcFlag::F as u8;
        self.pc = read_word(bus, RESET_VECTOR);
        self.instructions_executed = 0;
        self.cycles = 0;
        self.interrupts_received = 0;
        self.interrupts = InterruptState::default();
        self.state = ExecState::Running;
        self.ea = 0;
        log::debug!("reset: PC=${:04X}", self.pc);
    }

    pub fn assert_line(&mut self, line: InterruptLine) {
        self.interrupts.set(line, true);
    }

    pub fn deassert_line(&mut self, line: InterruptLine) {
        self.interrupts.set(line, false);
    }

    pub fn assert_irq(&mut self) {
        self.assert_line(InterruptLine::Irq);
    }

    pub fn assert_firq(&mut self) {
        self.assert_line(InterruptLine::Firq);
    }

    pub fn assert_nmi(&mut self) {
        self.assert_line(InterruptLine::Nmi);
    }

    pub fn deassert_irq(&mut self) {
        self.deassert_line(InterruptLine::Irq);
    }

    pub fn deassert_firq(&mut self) {
        self.deassert_line(InterruptLine::Firq);
    }

    pub fn deassert_nmi(&mut self) {
        self.deassert_line(InterruptLine::Nmi);
    }

    /// Execute one instruction, or service a pending interrupt.
    ///
    /// Returns the cycles consumed. On error the register file is rolled
    /// back to its value before the instruction, leaving PC on the faulting
    /// instruction.
    pub fn step<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> Result<u32, CpuError> {
        while let Some(request) = bus.next_line_request() {
            self.interrupts.apply(request);
        }

        self.instructions_executed += 1;
        bus.refresh();

        let mut cycles = 0;
        if let Some((line, entry_cycles)) = self.admit_interrupt(bus) {
            cycles += entry_cycles;
            if line != InterruptLine::Firq {
                self.cycles += u64::from(cycles);
                return Ok(cycles);
            }
        }

        if self.state == ExecState::SyncWait && self.interrupts.any() {
            log::debug!("SYNC released by masked interrupt request");
            self.state = ExecState::Running;
        }

        if self.is_waiting() {
            cycles += 1;
            self.cycles += u64::from(cycles);
            return Ok(cycles);
        }

        let before = self.snapshot();
        let start = self.pc;
        let (page, byte, entry) = self.fetch_opcode(bus);
        let opcode = entry.unwrap_or_else(|| {
            match page.prefix() {
                Some(prefix) => log::warn!(
                    "undefined opcode ${prefix:02X} ${byte:02X} at ${start:04X}, executed as no-op"
                ),
                None => {
                    log::warn!("undefined opcode ${byte:02X} at ${start:04X}, executed as no-op")
                }
            }
            ILLEGAL
        });

        let address_cycles = self.setup_addressing(bus, opcode.mode);
        match self.execute(bus, opcode.instruction) {
            Ok(extra) => {
                cycles += u32::from(opcode.cycles) + address_cycles + extra;
                self.cycles += u64::from(cycles);
                Ok(cycles)
            }
            Err(err) => {
                self.restore(&before);
                self.instructions_executed -= 1;
                Err(err)
            }
        }
    }

    /// Fetch the opcode at PC, following a page prefix, and advance PC past
    /// the opcode bytes.
    pub(crate) fn fetch_opcode<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> (Page, u8, Option<Opcode>) {
        let first = self.fetch_byte(bus);
        let page = match first {
            opcodes::PAGE10_PREFIX => Page::Page10,
            opcodes::PAGE11_PREFIX => Page::Page11,
            _ => return (Page::Unprefixed, first, opcodes::lookup(Page::Unprefixed, first)),
        };
        let byte = self.fetch_byte(bus);
        (page, byte, opcodes::lookup(page, byte))
    }

    /// Interrupt admission, in priority order NMI > IRQ > FIRQ. Returns the
    /// line serviced and the entry cycles.
    fn admit_interrupt<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> Option<(InterruptLine, u32)> {
        let (line, vector) = if self.interrupts.nmi {
            (InterruptLine::Nmi, NMI_VECTOR)
        } else if self.interrupts.irq && !self.flag(CcFlag::I) {
            (InterruptLine::Irq, IRQ_VECTOR)
        } else if self.interrupts.firq && !self.flag(CcFlag::F) {
            (InterruptLine::Firq, FIRQ_VECTOR)
        } else {
            return None;
        };

        let prestacked = self.state == ExecState::CwaiWait;
        let cycles = if prestacked {
            PRESTACKED_ENTRY_CYCLES
        } else if line == InterruptLine::Firq {
            self.push_fast_state(bus);
            FAST_ENTRY_CYCLES
        } else {
            self.push_entire_state(bus);
            ENTIRE_ENTRY_CYCLES
        };

        self.set_flag(CcFlag::I, true);
        self.set_flag(CcFlag::F, true);
        self.state = ExecState::Running;
        self.interrupts_received += 1;
        // NMI stays asserted until deasserted.
        match line {
            InterruptLine::Irq => self.interrupts.irq = false,
            InterruptLine::Firq => self.interrupts.firq = false,
            InterruptLine::Nmi => {}
        }
        self.pc = read_word(bus, vector);
        log::debug!("{line:?} admitted, vector ${vector:04X} -> ${:04X}", self.pc);
        Some((line, cycles))
    }

    /// Dispatch to the instruction's semantic handler. Returns extra cycles
    /// beyond the table's base count.
    fn execute<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        instruction: Instruction,
    ) -> Result<u32, CpuError> {
        use Instruction::*;

        let extra = match instruction {
            Nop | Illegal => 0,

            // 8-bit accumulator arithmetic and logic
            Adda => self.op_add8(bus, AccA, false),
            Addb => self.op_add8(bus, AccB, false),
            Adca => self.op_add8(bus, AccA, true),
            Adcb => self.op_add8(bus, AccB, true),
            Suba => self.op_sub8(bus, AccA, false),
            Subb => self.op_sub8(bus, AccB, false),
            Sbca => self.op_sub8(bus, AccA, true),
            Sbcb => self.op_sub8(bus, AccB, true),
            Cmpa => self.op_cmp8(bus, AccA),
            Cmpb => self.op_cmp8(bus, AccB),
            Anda => self.op_and8(bus, AccA),
            Andb => self.op_and8(bus, AccB),
            Bita => self.op_bit8(bus, AccA),
            Bitb => self.op_bit8(bus, AccB),
            Eora => self.op_eor8(bus, AccA),
            Eorb => self.op_eor8(bus, AccB),
            Ora => self.op_or8(bus, AccA),
            Orb => self.op_or8(bus, AccB),
            Andcc => self.op_andcc(bus),
            Orcc => self.op_orcc(bus),

            // 16-bit arithmetic and compare
            Addd => self.op_addd(bus),
            Subd => self.op_subd(bus),
            Cmpd => self.op_cmp16(bus, Register::D),
            Cmpx => self.op_cmp16(bus, Register::X),
            Cmpy => self.op_cmp16(bus, Register::Y),
            Cmpu => self.op_cmp16(bus, Register::U),
            Cmps => self.op_cmp16(bus, Register::S),
            Abx => self.op_abx(),
            Mul => self.op_mul(),
            Daa => self.op_daa(),
            Sex => self.op_sex(),

            // Unary and shift: accumulators and memory
            Nega => self.op_unary_acc(AccA, Self::perform_neg),
            Negb => self.op_unary_acc(AccB, Self::perform_neg),
            Neg => self.op_unary_mem(bus, Self::perform_neg),
            Coma => self.op_unary_acc(AccA, Self::perform_com),
            Comb => self.op_unary_acc(AccB, Self::perform_com),
            Com => self.op_unary_mem(bus, Self::perform_com),
            Inca => self.op_unary_acc(AccA, Self::perform_inc),
            Incb => self.op_unary_acc(AccB, Self::perform_inc),
            Inc => self.op_unary_mem(bus, Self::perform_inc),
            Deca => self.op_unary_acc(AccA, Self::perform_dec),
            Decb => self.op_unary_acc(AccB, Self::perform_dec),
            Dec => self.op_unary_mem(bus, Self::perform_dec),
            Clra => self.op_unary_acc(AccA, Self::perform_clr),
            Clrb => self.op_unary_acc(AccB, Self::perform_clr),
            Clr => self.op_unary_mem(bus, Self::perform_clr),
            Tsta => self.op_tst_acc(AccA),
            Tstb => self.op_tst_acc(AccB),
            Tst => self.op_tst_mem(bus),
            Asla => self.op_unary_acc(AccA, Self::perform_asl),
            Aslb => self.op_unary_acc(AccB, Self::perform_asl),
            Asl => self.op_unary_mem(bus, Self::perform_asl),
            Asra => self.op_unary_acc(AccA, Self::perform_asr),
            Asrb => self.op_unary_acc(AccB, Self::perform_asr),
            Asr => self.op_unary_mem(bus, Self::perform_asr),
            Lsra => self.op_unary_acc(AccA, Self::perform_lsr),
            Lsrb => self.op_unary_acc(AccB, Self::perform_lsr),
            Lsr => self.op_unary_mem(bus, Self::perform_lsr),
            Rola => self.op_unary_acc(AccA, Self::perform_rol),
            Rolb => self.op_unary_acc(AccB, Self::perform_rol),
            Rol => self.op_unary_mem(bus, Self::perform_rol),
            Rora => self.op_unary_acc(AccA, Self::perform_ror),
            Rorb => self.op_unary_acc(AccB, Self::perform_ror),
            Ror => self.op_unary_mem(bus, Self::perform_ror),

            // Loads, stores, effective address
            Lda => self.op_ld8(bus, AccA),
            Ldb => self.op_ld8(bus, AccB),
            Sta => self.op_st8(bus, AccA),
            Stb => self.op_st8(bus, AccB),
            Ldd => self.op_ld16(bus, Register::D),
            Ldx => self.op_ld16(bus, Register::X),
            Ldy => self.op_ld16(bus, Register::Y),
            Ldu => self.op_ld16(bus, Register::U),
            Lds => self.op_ld16(bus, Register::S),
            Std => self.op_st16(bus, Register::D),
            Stx => self.op_st16(bus, Register::X),
            Sty => self.op_st16(bus, Register::Y),
            Stu => self.op_st16(bus, Register::U),
            Sts => self.op_st16(bus, Register::S),
            Leax => self.op_lea(Register::X),
            Leay => self.op_lea(Register::Y),
            Leau => self.op_lea(Register::U),
            Leas => self.op_lea(Register::S),

            // Transfer and exchange
            Tfr => self.op_tfr(bus)?,
            Exg => self.op_exg(bus)?,

            // Branches, jumps, subroutines
            Bra | Brn | Bhi | Bls | Bcc | Bcs | Bne | Beq | Bvc | Bvs | Bpl | Bmi | Bge | Blt
            | Bgt | Ble => self.op_branch(instruction, false),
            Lbra | Lbrn | Lbhi | Lbls | Lbcc | Lbcs | Lbne | Lbeq | Lbvc | Lbvs | Lbpl | Lbmi
            | Lbge | Lblt | Lbgt | Lble => self.op_branch(instruction, true),
            Bsr | Lbsr | Jsr => self.op_call(bus),
            Jmp => self.op_jmp(),
            Rts => self.op_rts(bus),

            // Stack, interrupts, wait states
            Pshs => self.op_push(bus, StackPointer::S),
            Pshu => self.op_push(bus, StackPointer::U),
            Puls => self.op_pull(bus, StackPointer::S),
            Pulu => self.op_pull(bus, StackPointer::U),
            Rti => self.op_rti(bus),
            Swi => self.op_swi(bus, SWI_VECTOR, true),
            Swi2 => self.op_swi(bus, SWI2_VECTOR, false),
            Swi3 => self.op_swi(bus, SWI3_VECTOR, false),
            Cwai => self.op_cwai(bus),
            Sync => self.op_sync(),
        };
        Ok(extra)
    }

    #[inline]
    pub(crate) fn fetch_byte<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u8 {
        let val = bus.read(BusMaster::Cpu, self.pc);
        self.pc = self.pc.wrapping_add(1);
        val
    }

    #[inline]
    pub(crate) fn fetch_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> u16 {
        let hi = self.fetch_byte(bus);
        let lo = self.fetch_byte(bus);
        u16::from_be_bytes([hi, lo])
    }

    /// Eight-character CC rendering, `EFHINZVC` with `-` for clear bits.
    pub fn cc_string(&self) -> String {
        const FLAGS: [(CcFlag, char); 8] = [
            (CcFlag::E, 'E'),
            (CcFlag::F, 'F'),
            (CcFlag::H, 'H'),
            (CcFlag::I, 'I'),
            (CcFlag::N, 'N'),
            (CcFlag::Z, 'Z'),
            (CcFlag::V, 'V'),
            (CcFlag::C, 'C'),
        ];
        FLAGS
            .iter()
            .map(|&(flag, c)| if self.flag(flag) { c } else { '-' })
            .collect()
    }

    /// Multi-line register listing.
    pub fn registers(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "A: ${:02X}", self.a);
        let _ = writeln!(out, "B: ${:02X}", self.b);
        let _ = writeln!(out, "D: ${:04X}", self.d());
        let _ = writeln!(out, "X: ${:04X}", self.x);
        let _ = writeln!(out, "Y: ${:04X}", self.y);
        let _ = writeln!(out, "U: ${:04X}", self.u);
        let _ = writeln!(out, "S: ${:04X}", self.s);
        let _ = writeln!(out, "PC: ${:04X}", self.pc);
        let _ = writeln!(out, "DP: ${:02X}", self.dp);
        let _ = writeln!(out, "CC: {}", self.cc_string());
        out
    }

    /// Single-line register dump used in trace lines.
    pub fn register_line(&self) -> String {
        format!(
            "A:{:02X} B:{:02X} DP:{:02X} CC:{} X:{:04X} Y:{:04X} U:{:04X} S:{:04X} PC:{:04X}",
            self.a,
            self.b,
            self.dp,
            self.cc_string(),
            self.x,
            self.y,
            self.u,
            self.s,
            self.pc
        )
    }
}

impl Default for Turbo9 {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuStateTrait for Turbo9 {
    type Snapshot = Turbo9State;

    fn snapshot(&self) -> Turbo9State {
        Turbo9State {
            a: self.a,
            b: self.b,
            dp: self.dp,
            x: self.x,
            y: self.y,
            u: self.u,
            s: self.s,
            pc: self.pc,
            cc: self.cc,
        }
    }

    fn restore(&mut self, snapshot: &Turbo9State) {
        self.a = snapshot.a;
        self.b = snapshot.b;
        self.dp = snapshot.dp;
        self.x = snapshot.x;
        self.y = snapshot.y;
        self.u = snapshot.u;
        self.s = snapshot.s;
        self.pc = snapshot.pc;
        self.cc = snapshot.cc;
    }
}

/// Accumulator selector for the 8-bit handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Accumulator {
    A,
    B,
}

use Accumulator::{A as AccA, B as AccB};

/// Stack selector for PSH/PUL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StackPointer {
    S,
    U,
}

#[inline]
pub(crate) fn read_word<B: Bus<Address = u16, Data = u8> + ?Sized>(bus: &mut B, addr: u16) -> u16 {
    let hi = bus.read(BusMaster::Cpu, addr);
    let lo = bus.read(BusMaster::Cpu, addr.wrapping_add(1));
    u16::from_be_bytes([hi, lo])
}

#[inline]
pub(crate) fn write_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
    bus: &mut B,
    addr: u16,
    val: u16,
) {
    let [hi, lo] = val.to_be_bytes();
    bus.write(BusMaster::Cpu, addr, hi);
    bus.write(BusMaster::Cpu, addr.wrapping_add(1), lo);
}
