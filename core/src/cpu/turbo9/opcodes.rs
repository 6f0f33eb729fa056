//! Opcode tables for the three Turbo9 opcode pages.
//!
//! Each page is a 256-entry table built at compile time. Decoding is a plain
//! index into the table; an empty slot is an undefined opcode.

use std::fmt;

/// Prefix byte selecting the second opcode page.
pub const PAGE10_PREFIX: u8 = 0x10;
/// Prefix byte selecting the third opcode page.
pub const PAGE11_PREFIX: u8 = 0x11;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Unprefixed,
    Page10,
    Page11,
}

impl Page {
    /// The prefix byte that selects this page, if any.
    pub fn prefix(self) -> Option<u8> {
        match self {
            Page::Unprefixed => None,
            Page::Page10 => Some(PAGE10_PREFIX),
            Page::Page11 => Some(PAGE11_PREFIX),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Inherent,
    Immediate8,
    Immediate16,
    Direct,
    Extended,
    Indexed,
    Relative8,
    Relative16,
}

impl AddressMode {
    /// Operand bytes that follow the opcode. Indexed mode counts only the
    /// postbyte; the postbyte decides how many offset bytes follow it.
    pub fn operand_len(self) -> u16 {
        match self {
            AddressMode::Inherent => 0,
            AddressMode::Immediate8
            | AddressMode::Direct
            | AddressMode::Indexed
            | AddressMode::Relative8 => 1,
            AddressMode::Immediate16 | AddressMode::Extended | AddressMode::Relative16 => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    Abx,
    Adca,
    Adcb,
    Adda,
    Addb,
    Addd,
    Anda,
    Andb,
    Andcc,
    Asl,
    Asla,
    Aslb,
    Asr,
    Asra,
    Asrb,
    Bcc,
    Bcs,
    Beq,
    Bge,
    Bgt,
    Bhi,
    Bita,
    Bitb,
    Ble,
    Bls,
    Blt,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brn,
    Bsr,
    Bvc,
    Bvs,
    Clr,
    Clra,
    Clrb,
    Cmpa,
    Cmpb,
    Cmpd,
    Cmps,
    Cmpu,
    Cmpx,
    Cmpy,
    Com,
    Coma,
    Comb,
    Cwai,
    Daa,
    Dec,
    Deca,
    Decb,
    Eora,
    Eorb,
    Exg,
    Inc,
    Inca,
    Incb,
    Jmp,
    Jsr,
    Lbcc,
    Lbcs,
    Lbeq,
    Lbge,
    Lbgt,
    Lbhi,
    Lble,
    Lbls,
    Lblt,
    Lbmi,
    Lbne,
    Lbpl,
    Lbra,
    Lbrn,
    Lbsr,
    Lbvc,
    Lbvs,
    Lda,
    Ldb,
    Ldd,
    Lds,
    Ldu,
    Ldx,
    Ldy,
    Leas,
    Leau,
    Leax,
    Leay,
    Lsr,
    Lsra,
    Lsrb,
    Mul,
    Neg,
    Nega,
    Negb,
    Nop,
    Ora,
    Orb,
    Orcc,
    Pshs,
    Pshu,
    Puls,
    Pulu,
    Rol,
    Rola,
    Rolb,
    Ror,
    Rora,
    Rorb,
    Rti,
    Rts,
    Sbca,
    Sbcb,
    Sex,
    Sta,
    Stb,
    Std,
    Sts,
    Stu,
    Stx,
    Sty,
    Suba,
    Subb,
    Subd,
    Swi,
    Swi2,
    Swi3,
    Sync,
    Tfr,
    Tst,
    Tsta,
    Tstb,
    /// Undefined opcode, executed as a no-op.
    Illegal,
}

impl Instruction {
    pub fn mnemonic(self) -> &'static str {
        use Instruction::*;
        match self {
            Abx => "ABX",
            Adca => "ADCA",
            Adcb => "ADCB",
            Adda => "ADDA",
            Addb => "ADDB",
            Addd => "ADDD",
            Anda => "ANDA",
            Andb => "ANDB",
            Andcc => "ANDCC",
            Asl => "ASL",
            Asla => "ASLA",
            Aslb => "ASLB",
            Asr => "ASR",
            Asra => "ASRA",
            Asrb => "ASRB",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bge => "BGE",
            Bgt => "BGT",
            Bhi => "BHI",
            Bita => "BITA",
            Bitb => "BITB",
            Ble => "BLE",
            Bls => "BLS",
            Blt => "BLT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Bra => "BRA",
            Brn => "BRN",
            Bsr => "BSR",
            Bvc => "BVC",
            Bvs => "BVS",
            Clr => "CLR",
            Clra => "CLRA",
            Clrb => "CLRB",
            Cmpa => "CMPA",
            Cmpb => "CMPB",
            Cmpd => "CMPD",
            Cmps => "CMPS",
            Cmpu => "CMPU",
            Cmpx => "CMPX",
            Cmpy => "CMPY",
            Com => "COM",
            Coma => "COMA",
            Comb => "COMB",
            Cwai => "CWAI",
            Daa => "DAA",
            Dec => "DEC",
            Deca => "DECA",
            Decb => "DECB",
            Eora => "EORA",
            Eorb => "EORB",
            Exg => "EXG",
            Inc => "INC",
            Inca => "INCA",
            Incb => "INCB",
            Jmp => "JMP",
            Jsr => "JSR",
            Lbcc => "LBCC",
            Lbcs => "LBCS",
            Lbeq => "LBEQ",
            Lbge => "LBGE",
            Lbgt => "LBGT",
            Lbhi => "LBHI",
            Lble => "LBLE",
            Lbls => "LBLS",
            Lblt => "LBLT",
            Lbmi => "LBMI",
            Lbne => "LBNE",
            Lbpl => "LBPL",
            Lbra => "LBRA",
            Lbrn => "LBRN",
            Lbsr => "LBSR",
            Lbvc => "LBVC",
            Lbvs => "LBVS",
            Lda => "LDA",
            Ldb => "LDB",
            Ldd => "LDD",
            Lds => "LDS",
            Ldu => "LDU",
            Ldx => "LDX",
            Ldy => "LDY",
            Leas => "LEAS",
            Leau => "LEAU",
            Leax => "LEAX",
            Leay => "LEAY",
            Lsr => "LSR",
            Lsra => "LSRA",
            Lsrb => "LSRB",
            Mul => "MUL",
            Neg => "NEG",
            Nega => "NEGA",
            Negb => "NEGB",
            Nop => "NOP",
            Ora => "ORA",
            Orb => "ORB",
            Orcc => "ORCC",
            Pshs => "PSHS",
            Pshu => "PSHU",
            Puls => "PULS",
            Pulu => "PULU",
            Rol => "ROL",
            Rola => "ROLA",
            Rolb => "ROLB",
            Ror => "ROR",
            Rora => "RORA",
            Rorb => "RORB",
            Rti => "RTI",
            Rts => "RTS",
            Sbca => "SBCA",
            Sbcb => "SBCB",
            Sex => "SEX",
            Sta => "STA",
            Stb => "STB",
            Std => "STD",
            Sts => "STS",
            Stu => "STU",
            Stx => "STX",
            Sty => "STY",
            Suba => "SUBA",
            Subb => "SUBB",
            Subd => "SUBD",
            Swi => "SWI",
            Swi2 => "SWI2",
            Swi3 => "SWI3",
            Sync => "SYNC",
            Tfr => "TFR",
            Tst => "TST",
            Tsta => "TSTA",
            Tstb => "TSTB",
            Illegal => "???",
        }
    }

    /// Short and long branches, conditional or not. BSR/LBSR are calls, not
    /// branches.
    pub fn is_branch(self) -> bool {
        use Instruction::*;
        matches!(
            self,
            Bcc | Bcs
                | Beq
                | Bge
                | Bgt
                | Bhi
                | Ble
                | Bls
                | Blt
                | Bmi
                | Bne
                | Bpl
                | Bra
                | Brn
                | Bvc
                | Bvs
                | Lbcc
                | Lbcs
                | Lbeq
                | Lbge
                | Lbgt
                | Lbhi
                | Lble
                | Lbls
                | Lblt
                | Lbmi
                | Lbne
                | Lbpl
                | Lbra
                | Lbrn
                | Lbvc
                | Lbvs
        )
    }

    pub fn is_subroutine_call(self) -> bool {
        matches!(self, Instruction::Bsr | Instruction::Lbsr | Instruction::Jsr)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One decoded opcode table entry. `cycles` is the base cycle count; indexed
/// addressing and some instructions add cycles on top of it at run time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub instruction: Instruction,
    pub mode: AddressMode,
    pub cycles: u8,
}

const fn op(instruction: Instruction, mode: AddressMode, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        instruction,
        mode,
        cycles,
    })
}

type Table = [Option<Opcode>; 256];

const fn build_unprefixed() -> Table {
    use AddressMode::*;
    use Instruction::*;

    let mut t: Table = [None; 256];

    // Read-modify-write memory ops: direct $0x, indexed $6x, extended $7x.
    let memory_unary = [
        (0x0, Neg),
        (0x3, Com),
        (0x4, Lsr),
        (0x6, Ror),
        (0x7, Asr),
        (0x8, Asl),
        (0x9, Rol),
        (0xA, Dec),
        (0xC, Inc),
        (0xD, Tst),
        (0xF, Clr),
    ];
    let mut i = 0;
    while i < memory_unary.len() {
        let (lo, ins) = memory_unary[i];
        t[lo] = op(ins, Direct, 6);
        t[0x60 | lo] = op(ins, Indexed, 6);
        t[0x70 | lo] = op(ins, Extended, 7);
        i += 1;
    }
    t[0x0E] = op(Jmp, Direct, 3);
    t[0x6E] = op(Jmp, Indexed, 3);
    t[0x7E] = op(Jmp, Extended, 4);

    // Accumulator inherent ops: A at $4x, B at $5x.
    let register_unary = [
        (0x0, Nega, Negb),
        (0x3, Coma, Comb),
        (0x4, Lsra, Lsrb),
        (0x6, Rora, Rorb),
        (0x7, Asra, Asrb),
        (0x8, Asla, Aslb),
        (0x9, Rola, Rolb),
        (0xA, Deca, Decb),
        (0xC, Inca, Incb),
        (0xD, Tsta, Tstb),
        (0xF, Clra, Clrb),
    ];
    let mut i = 0;
    while i < register_unary.len() {
        let (lo, ins_a, ins_b) = register_unary[i];
        t[0x40 | lo] = op(ins_a, Inherent, 2);
        t[0x50 | lo] = op(ins_b, Inherent, 2);
        i += 1;
    }

    t[0x12] = op(Nop, Inherent, 2);
    t[0x13] = op(Sync, Inherent, 4);
    t[0x16] = op(Lbra, Relative16, 5);
    t[0x17] = op(Lbsr, Relative16, 9);
    t[0x19] = op(Daa, Inherent, 2);
    t[0x1A] = op(Orcc, Immediate8, 3);
    t[0x1C] = op(Andcc, Immediate8, 3);
    t[0x1D] = op(Sex, Inherent, 2);
    t[0x1E] = op(Exg, Immediate8, 8);
    t[0x1F] = op(Tfr, Immediate8, 6);

    let short_branches = [
        Bra, Brn, Bhi, Bls, Bcc, Bcs, Bne, Beq, Bvc, Bvs, Bpl, Bmi, Bge, Blt, Bgt, Ble,
    ];
    let mut i = 0;
    while i < short_branches.len() {
        t[0x20 + i] = op(short_branches[i], Relative8, 3);
        i += 1;
    }

    t[0x30] = op(Leax, Indexed, 4);
    t[0x31] = op(Leay, Indexed, 4);
    t[0x32] = op(Leas, Indexed, 4);
    t[0x33] = op(Leau, Indexed, 4);
    t[0x34] = op(Pshs, Immediate8, 5);
    t[0x35] = op(Puls, Immediate8, 5);
    t[0x36] = op(Pshu, Immediate8, 5);
    t[0x37] = op(Pulu, Immediate8, 5);
    t[0x39] = op(Rts, Inherent, 5);
    t[0x3A] = op(Abx, Inherent, 3);
    t[0x3B] = op(Rti, Inherent, 6);
    t[0x3C] = op(Cwai, Immediate8, 20);
    t[0x3D] = op(Mul, Inherent, 11);
    t[0x3F] = op(Swi, Inherent, 19);

    // 8-bit accumulator ops: A at $8x-$Bx, B at $Cx-$Fx.
    let accumulator = [
        (0x0, Suba, Subb),
        (0x1, Cmpa, Cmpb),
        (0x2, Sbca, Sbcb),
        (0x4, Anda, Andb),
        (0x5, Bita, Bitb),
        (0x6, Lda, Ldb),
        (0x8, Eora, Eorb),
        (0x9, Adca, Adcb),
        (0xA, Ora, Orb),
        (0xB, Adda, Addb),
    ];
    let mut i = 0;
    while i < accumulator.len() {
        let (lo, ins_a, ins_b) = accumulator[i];
        t[0x80 | lo] = op(ins_a, Immediate8, 2);
        t[0x90 | lo] = op(ins_a, Direct, 4);
        t[0xA0 | lo] = op(ins_a, Indexed, 4);
        t[0xB0 | lo] = op(ins_a, Extended, 5);
        t[0xC0 | lo] = op(ins_b, Immediate8, 2);
        t[0xD0 | lo] = op(ins_b, Direct, 4);
        t[0xE0 | lo] = op(ins_b, Indexed, 4);
        t[0xF0 | lo] = op(ins_b, Extended, 5);
        i += 1;
    }
    t[0x97] = op(Sta, Direct, 4);
    t[0xA7] = op(Sta, Indexed, 4);
    t[0xB7] = op(Sta, Extended, 5);
    t[0xD7] = op(Stb, Direct, 4);
    t[0xE7] = op(Stb, Indexed, 4);
    t[0xF7] = op(Stb, Extended, 5);

    // 16-bit arithmetic and compare: 4/6/6/7 cycles.
    let word_alu = [(0x83, Subd), (0x8C, Cmpx), (0xC3, Addd)];
    let mut i = 0;
    while i < word_alu.len() {
        let (base, ins) = word_alu[i];
        t[base] = op(ins, Immediate16, 4);
        t[base + 0x10] = op(ins, Direct, 6);
        t[base + 0x20] = op(ins, Indexed, 6);
        t[base + 0x30] = op(ins, Extended, 7);
        i += 1;
    }

    // 16-bit loads: 3/5/5/6 cycles. Stores: 5/5/6 cycles.
    let word_load = [(0x8E, Ldx), (0xCC, Ldd), (0xCE, Ldu)];
    let mut i = 0;
    while i < word_load.len() {
        let (base, ins) = word_load[i];
        t[base] = op(ins, Immediate16, 3);
        t[base + 0x10] = op(ins, Direct, 5);
        t[base + 0x20] = op(ins, Indexed, 5);
        t[base + 0x30] = op(ins, Extended, 6);
        i += 1;
    }
    let word_store = [(0x9F, Stx), (0xDD, Std), (0xDF, Stu)];
    let mut i = 0;
    while i < word_store.len() {
        let (base, ins) = word_store[i];
        t[base] = op(ins, Direct, 5);
        t[base + 0x10] = op(ins, Indexed, 5);
        t[base + 0x20] = op(ins, Extended, 6);
        i += 1;
    }

    t[0x8D] = op(Bsr, Relative8, 7);
    t[0x9D] = op(Jsr, Direct, 7);
    t[0xAD] = op(Jsr, Indexed, 7);
    t[0xBD] = op(Jsr, Extended, 8);

    t
}

const fn build_page10() -> Table {
    use AddressMode::*;
    use Instruction::*;

    let mut t: Table = [None; 256];

    let long_branches = [
        Lbrn, Lbhi, Lbls, Lbcc, Lbcs, Lbne, Lbeq, Lbvc, Lbvs, Lbpl, Lbmi, Lbge, Lblt, Lbgt, Lble,
    ];
    let mut i = 0;
    while i < long_branches.len() {
        t[0x21 + i] = op(long_branches[i], Relative16, 5);
        i += 1;
    }

    t[0x3F] = op(Swi2, Inherent, 20);

    let compares = [(0x83, Cmpd), (0x8C, Cmpy)];
    let mut i = 0;
    while i < compares.len() {
        let (base, ins) = compares[i];
        t[base] = op(ins, Immediate16, 5);
        t[base + 0x10] = op(ins, Direct, 7);
        t[base + 0x20] = op(ins, Indexed, 7);
        t[base + 0x30] = op(ins, Extended, 8);
        i += 1;
    }

    let loads = [(0x8E, Ldy), (0xCE, Lds)];
    let mut i = 0;
    while i < loads.len() {
        let (base, ins) = loads[i];
        t[base] = op(ins, Immediate16, 4);
        t[base + 0x10] = op(ins, Direct, 6);
        t[base + 0x20] = op(ins, Indexed, 6);
        t[base + 0x30] = op(ins, Extended, 7);
        i += 1;
    }

    let stores = [(0x9F, Sty), (0xDF, Sts)];
    let mut i = 0;
    while i < stores.len() {
        let (base, ins) = stores[i];
        t[base] = op(ins, Direct, 6);
        t[base + 0x10] = op(ins, Indexed, 6);
        t[base + 0x20] = op(ins, Extended, 7);
        i += 1;
    }

    t
}

const fn build_page11() -> Table {
    use AddressMode::*;
    use Instruction::*;

    let mut t: Table = [None; 256];
    t[0x3F] = op(Swi3, Inherent, 20);

    let compares = [(0x83, Cmpu), (0x8C, Cmps)];
    let mut i = 0;
    while i < compares.len() {
        let (base, ins) = compares[i];
        t[base] = op(ins, Immediate16, 5);
        t[base + 0x10] = op(ins, Direct, 7);
        t[base + 0x20] = op(ins, Indexed, 7);
        t[base + 0x30] = op(ins, Extended, 8);
        i += 1;
    }

    t
}

static UNPREFIXED: Table = build_unprefixed();
static PAGE10: Table = build_page10();
static PAGE11: Table = build_page11();

/// Look up the table entry for `byte` on `page`.
#[inline]
pub fn lookup(page: Page, byte: u8) -> Option<Opcode> {
    match page {
        Page::Unprefixed => UNPREFIXED[byte as usize],
        Page::Page10 => PAGE10[byte as usize],
        Page::Page11 => PAGE11[byte as usize],
    }
}

/// Whether `byte` on `page` is a documented opcode. The prefix bytes
/// themselves are not opcodes.
pub fn is_defined(page: Page, byte: u8) -> bool {
    lookup(page, byte).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defined_count(page: Page) -> usize {
        (0..=255u8).filter(|&b| is_defined(page, b)).count()
    }

    #[test]
    fn page_sizes_match_opcode_map() {
        assert_eq!(defined_count(Page::Unprefixed), 221);
        assert_eq!(defined_count(Page::Page10), 38);
        assert_eq!(defined_count(Page::Page11), 9);
    }

    #[test]
    fn prefixes_are_not_opcodes() {
        assert!(!is_defined(Page::Unprefixed, PAGE10_PREFIX));
        assert!(!is_defined(Page::Unprefixed, PAGE11_PREFIX));
    }

    #[test]
    fn representative_entries() {
        let lda = lookup(Page::Unprefixed, 0x86).unwrap();
        assert_eq!(lda.instruction, Instruction::Lda);
        assert_eq!(lda.mode, AddressMode::Immediate8);
        assert_eq!(lda.cycles, 2);

        let stx = lookup(Page::Unprefixed, 0xBF).unwrap();
        assert_eq!(stx.instruction, Instruction::Stx);
        assert_eq!(stx.mode, AddressMode::Extended);

        let ldy = lookup(Page::Page10, 0x8E).unwrap();
        assert_eq!(ldy.instruction, Instruction::Ldy);
        assert_eq!(ldy.mode, AddressMode::Immediate16);

        let lbeq = lookup(Page::Page10, 0x27).unwrap();
        assert_eq!(lbeq.instruction, Instruction::Lbeq);
        assert_eq!(lbeq.mode, AddressMode::Relative16);

        let cmps = lookup(Page::Page11, 0xBC).unwrap();
        assert_eq!(cmps.instruction, Instruction::Cmps);
        assert_eq!(cmps.cycles, 8);
    }

    #[test]
    fn undefined_slots() {
        for byte in [0x01, 0x02, 0x05, 0x0B, 0x14, 0x15, 0x18, 0x1B, 0x38, 0x3E, 0x87, 0xC7, 0xCD]
        {
            assert!(!is_defined(Page::Unprefixed, byte), "${byte:02X}");
        }
        assert!(!is_defined(Page::Page10, 0x20));
        assert!(!is_defined(Page::Page10, 0x86));
        assert!(!is_defined(Page::Page11, 0x8E));
    }

    #[test]
    fn classification() {
        assert!(Instruction::Bne.is_branch());
        assert!(Instruction::Lbra.is_branch());
        assert!(!Instruction::Bsr.is_branch());
        assert!(Instruction::Bsr.is_subroutine_call());
        assert!(Instruction::Lbsr.is_subroutine_call());
        assert!(Instruction::Jsr.is_subroutine_call());
        assert!(!Instruction::Jmp.is_subroutine_call());
    }
}
