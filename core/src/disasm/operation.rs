use std::fmt;

use crate::cpu::turbo9::{
    AddressMode, IndexedForm, IndexedPostbyte, Instruction, Page, Register,
};

/// Operand bytes that directly follow the opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    None,
    Immediate8(u8),
    Immediate16(u16),
    Direct(u8),
    Extended(u16),
    /// The indexed postbyte.
    Indexed(u8),
    Relative8(u8),
    Relative16(u16),
}

/// Offset bytes that follow an indexed postbyte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostOperand {
    None,
    Byte(u8),
    Word(u16),
}

/// One decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    /// Symbol at `offset`, or empty.
    pub label: String,
    pub offset: u16,
    pub page: Page,
    pub opcode: u8,
    pub instruction: Instruction,
    pub mode: AddressMode,
    pub operand: Operand,
    pub post_operand: PostOperand,
    /// Encoded size in bytes, including any prefix and OS-9 call byte.
    pub size: u16,
    pub bytes: Vec<u8>,
    /// Function code following SWI2 when rendered as an OS-9 system call.
    pub os9_call: Option<u8>,
    /// Symbol at the branch target, or empty.
    pub target_label: String,
}

impl Operation {
    pub fn is_branch(&self) -> bool {
        self.instruction.is_branch()
    }

    pub fn is_subroutine_call(&self) -> bool {
        self.instruction.is_subroutine_call()
    }

    /// Address of the next instruction in memory.
    pub fn next_offset(&self) -> u16 {
        self.offset.wrapping_add(self.size)
    }

    /// Absolute target of a relative branch or call.
    pub fn branch_target(&self) -> Option<u16> {
        let end = self.next_offset();
        match self.operand {
            Operand::Relative8(rel) => Some(end.wrapping_add(rel as i8 as u16)),
            Operand::Relative16(rel) => Some(end.wrapping_add(rel)),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        if self.os9_call.is_some() {
            "OS9"
        } else {
            self.instruction.mnemonic()
        }
    }

    /// Operand in Motorola assembler syntax.
    pub fn operand_text(&self) -> String {
        if let Some(call) = self.os9_call {
            return format!("${call:02X}");
        }
        match self.operand {
            Operand::None => String::new(),
            Operand::Immediate8(val) => match self.instruction {
                Instruction::Tfr | Instruction::Exg => register_pair(val),
                Instruction::Pshs | Instruction::Puls => register_list(val, "U"),
                Instruction::Pshu | Instruction::Pulu => register_list(val, "S"),
                _ => format!("#${val:02X}"),
            },
            Operand::Immediate16(val) => format!("#${val:04X}"),
            Operand::Direct(addr) => format!("<${addr:02X}"),
            Operand::Extended(addr) => format!("${addr:04X}"),
            Operand::Indexed(postbyte) => indexed_text(postbyte, self.post_operand),
            Operand::Relative8(_) | Operand::Relative16(_) => {
                if !self.target_label.is_empty() {
                    return self.target_label.clone();
                }
                match self.branch_target() {
                    Some(target) => format!("${target:04X}"),
                    None => String::new(),
                }
            }
        }
    }

    /// Listing line: address, raw bytes, label, mnemonic and operand.
    pub fn as_code(&self) -> String {
        let bytes = self
            .bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        let label = if self.label.is_empty() {
            String::new()
        } else {
            format!("{}: ", self.label)
        };
        let line = format!(
            "{:04X}  {:<14}  {}{:<5} {}",
            self.offset,
            bytes,
            label,
            self.mnemonic(),
            self.operand_text()
        );
        line.trim_end().to_string()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_code())
    }
}

fn register_name(code: u8) -> &'static str {
    Register::from_code(code).map_or("?", Register::name)
}

fn register_pair(postbyte: u8) -> String {
    format!(
        "{},{}",
        register_name(postbyte >> 4),
        register_name(postbyte & 0x0F)
    )
}

/// PSH/PUL register list, in pull order.
fn register_list(mask: u8, other_stack: &str) -> String {
    let names = ["CC", "A", "B", "DP", "X", "Y", other_stack, "PC"];
    let list: Vec<&str> = (0..8)
        .filter(|bit| mask & (1u8 << bit) != 0)
        .map(|bit| names[bit])
        .collect();
    list.join(",")
}

fn indexed_text(postbyte: u8, post: PostOperand) -> String {
    let decoded = IndexedPostbyte::decode(postbyte);
    let r = decoded.register.name();
    let byte = match post {
        PostOperand::Byte(val) => val,
        _ => 0,
    };
    let word = match post {
        PostOperand::Word(val) => val,
        _ => 0,
    };
    let body = match decoded.form {
        IndexedForm::Offset5(offset) => format!("{offset},{r}"),
        IndexedForm::PostIncrement1 => format!(",{r}+"),
        IndexedForm::PostIncrement2 => format!(",{r}++"),
        IndexedForm::PreDecrement1 => format!(",-{r}"),
        IndexedForm::PreDecrement2 => format!(",--{r}"),
        IndexedForm::NoOffset => format!(",{r}"),
        IndexedForm::AccumulatorB => format!("B,{r}"),
        IndexedForm::AccumulatorA => format!("A,{r}"),
        IndexedForm::AccumulatorD => format!("D,{r}"),
        IndexedForm::Offset8 => format!("{},{r}", byte as i8),
        IndexedForm::Offset16 => format!("${word:04X},{r}"),
        IndexedForm::PcRelative8 => format!("{},PCR", byte as i8),
        IndexedForm::PcRelative16 => format!("${word:04X},PCR"),
        IndexedForm::ExtendedIndirect => format!("${word:04X}"),
        IndexedForm::Reserved => format!("??,{r}"),
    };
    if decoded.indirect {
        format!("[{body}]")
    } else {
        body
    }
}
