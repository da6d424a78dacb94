//! Turns a descriptor string such as `"LDA nnnn,X"` into a mnemonic and an addressing mode.
//!
//! The operand is not a real value; it's a pattern that says how many operand bytes
//! there are and how they combine into an address:
//!
//!| pattern | mode |
//!| --- | --- |
//!| `#nn` | Immediate |
//!| `nn` | ZeroPage (Relative for branches) |
//!| `nn,X` `nn,Y` | ZeroPageIndexedX, ZeroPageIndexedY |
//!| `nnnn` | Absolute |
//!| `nnnn,X` `nnnn,Y` | AbsoluteIndexedX, AbsoluteIndexedY |
//!| `(nn),Y` | IndirectIndexedY |
//!| `(nn,X)` | IndexedIndirectX |
//!| `(nnnn)` | IndirectAbsolute |
//!| _none_ | Implied |
//!
//! Patterns are case-insensitive and blanks are allowed around the comma and
//! inside the parentheses, so `ORA (nn, X)` is fine.
use super::mnemonic::{Class, Index, Mnemonic};
use super::*;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_STATEMENT: Regex = Regex::new(r"^\s*([^\s]+)(?:\s+(.*?))?\s*$").unwrap();
    static ref RE_OPERANDS: Vec<(Regex, AddressingMode)> = [
        (r"^#\s*nn$", AddressingMode::Immediate),
        (r"^nn$", AddressingMode::ZeroPage),
        (r"^nn\s*,\s*x$", AddressingMode::ZeroPageIndexedX),
        (r"^nn\s*,\s*y$", AddressingMode::ZeroPageIndexedY),
        (r"^nnnn$", AddressingMode::Absolute),
        (r"^nnnn\s*,\s*x$", AddressingMode::AbsoluteIndexedX),
        (r"^nnnn\s*,\s*y$", AddressingMode::AbsoluteIndexedY),
        (r"^\(\s*nn\s*\)\s*,\s*y$", AddressingMode::IndirectIndexedY),
        (r"^\(\s*nn\s*,\s*x\s*\)$", AddressingMode::IndexedIndirectX),
        (r"^\(\s*nnnn\s*\)$", AddressingMode::IndirectAbsolute),
    ]
    .iter()
    .map(|(re, am)| (Regex::new(&format!("(?i){}", re)).unwrap(), *am))
    .collect();
}

/// All the addressing modes a descriptor can name.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum AddressingMode {
    Implied,
    Immediate,
    ZeroPage,
    ZeroPageIndexedX,
    ZeroPageIndexedY,
    Absolute,
    AbsoluteIndexedX,
    AbsoluteIndexedY,
    /// `(nn),Y`
    IndirectIndexedY,
    /// `(nn,X)`
    IndexedIndirectX,
    /// `(nnnn)`, JMP only
    IndirectAbsolute,
    /// branch displacement
    Relative,
}
impl AddressingMode {
    #[cfg(test)]
    pub const ALL: [AddressingMode; 12] = [
        AddressingMode::Implied,
        AddressingMode::Immediate,
        AddressingMode::ZeroPage,
        AddressingMode::ZeroPageIndexedX,
        AddressingMode::ZeroPageIndexedY,
        AddressingMode::Absolute,
        AddressingMode::AbsoluteIndexedX,
        AddressingMode::AbsoluteIndexedY,
        AddressingMode::IndirectIndexedY,
        AddressingMode::IndexedIndirectX,
        AddressingMode::IndirectAbsolute,
        AddressingMode::Relative,
    ];
    /// true for the modes that resolve an effective address for a data operand
    pub fn is_memory(&self) -> bool {
        use AddressingMode::*;
        matches!(
            self,
            ZeroPage
                | ZeroPageIndexedX
                | ZeroPageIndexedY
                | Absolute
                | AbsoluteIndexedX
                | AbsoluteIndexedY
                | IndirectIndexedY
                | IndexedIndirectX
        )
    }
    /// the index register applied with page-crossing timing (not the zero-page kind)
    pub fn page_index(&self) -> Option<Index> {
        match self {
            AddressingMode::AbsoluteIndexedX => Some(Index::X),
            AddressingMode::AbsoluteIndexedY | AddressingMode::IndirectIndexedY => Some(Index::Y),
            _ => None,
        }
    }
}

impl Class {
    /// Returns true if instructions of this class can be encoded with the given addressing mode.
    pub fn accepts(&self, mnemonic: Mnemonic, am: AddressingMode) -> bool {
        use AddressingMode::*;
        match self {
            Class::Branch => am == Relative,
            Class::Jump => am == Absolute || am == IndirectAbsolute,
            Class::Subroutine => am == Absolute,
            Class::Break
            | Class::Interrupt
            | Class::Reset
            | Class::Return
            | Class::ReturnFromInterrupt
            | Class::Push
            | Class::Pull
            | Class::Register
            | Class::Illegal => am == Implied,
            Class::Shift => am == Implied || am.is_memory(),
            Class::ReadModifyWrite | Class::Store => am.is_memory(),
            Class::UnstableStore => am
                .page_index()
                .and_then(|index| mnemonic.unstable_index_op(index))
                .is_some(),
            Class::Read => am == Immediate || (am.is_memory() && !mnemonic.is_immediate_only()),
            Class::Nop => am == Implied || am == Immediate || am.is_memory(),
        }
    }
}

/// A classified descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
}
impl Instruction {
    pub fn class(&self) -> Class { self.mnemonic.class() }
}
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{} {:?}", self.mnemonic, self.mode) }
}

/// Match the operand text against the operand patterns.
fn parse_operand(operand: &str) -> Result<AddressingMode, Error> {
    RE_OPERANDS
        .iter()
        .find(|(re, _)| re.is_match(operand))
        .map(|(_, am)| *am)
        .ok_or_else(|| mode_err!("unrecognized operand \"{}\"", operand))
}

/// Classify a descriptor string of the form `MNEM` or `MNEM operand`.
pub fn classify(text: &str) -> Result<Instruction, Error> {
    let caps = RE_STATEMENT
        .captures(text)
        .ok_or_else(|| inst_err!("empty descriptor"))?;
    let name = caps.get(1).map_or("", |m| m.as_str()).to_uppercase();
    let operand = caps.get(2).map_or("", |m| m.as_str());
    let mnemonic = Mnemonic::from_str(name.as_str()).ok_or_else(|| inst_err!("unknown mnemonic \"{}\"", name))?;
    let mut mode = if operand.is_empty() {
        AddressingMode::Implied
    } else {
        parse_operand(operand)?
    };
    let class = mnemonic.class();
    if class == Class::Branch && mode == AddressingMode::ZeroPage {
        // a branch's single operand byte is a displacement, not an address
        mode = AddressingMode::Relative;
    }
    if !class.accepts(mnemonic, mode) {
        return Err(inst_err!("{} can't be used with {:?} addressing", mnemonic, mode));
    }
    Ok(Instruction { mnemonic, mode })
}
