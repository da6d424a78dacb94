//! The hand-authored instruction list the table is generated from.
//!
//! There is one entry per opcode byte followed by the two pseudo-opcodes that the
//! execution engine enters directly rather than through an opcode fetch. Each entry is
//! a mnemonic plus an operand pattern as understood by the classifier.
use super::*;

use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Number of real opcodes.
pub const OPCODE_COUNT: usize = 0x100;
/// Table id of the maskable interrupt entry sequence.
pub const INTERRUPT_ID: u16 = 0x100;
/// Table id of the reset sequence. This is always the last table entry.
pub const RESET_ID: u16 = 0x101;
/// Number of entries in a complete descriptor list.
pub const ENTRY_COUNT: usize = OPCODE_COUNT + 2;

lazy_static! {
    // <id> <mnemonic> [operand] [; comment]
    static ref RE_LINE: Regex = Regex::new(r"^\s*(0[xX]|\$)?([0-9a-fA-F]+)([hH])?\s+([^\s;]+)(?:\s+([^;]*?))?\s*(?:;.*)?$").unwrap();
    static ref RE_COMMENT_OR_BLANK_LINE: Regex = Regex::new(r"^\s*(?:;.*)?$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// opcode byte, or INTERRUPT_ID / RESET_ID
    pub id: u16,
    /// mnemonic and operand pattern, e.g. "LDA nnnn,X"
    pub text: String,
}
impl Descriptor {
    pub fn new(id: u16, text: &str) -> Self {
        Descriptor {
            id,
            text: text.to_string(),
        }
    }
}
impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "0x{:02X}: {}", self.id, self.text) }
}

/// The built-in descriptor list, indexed by table id.
#[rustfmt::skip]
pub const DESCRIPTORS: [&str; ENTRY_COUNT] = [
    /* 0x00 */ "BRK", "ORA (nn,X)", "???", "SLO (nn,X)", "NOP nn", "ORA nn", "ASL nn", "SLO nn",
    /* 0x08 */ "PHP", "ORA #nn", "ASL", "ANC #nn", "NOP nnnn", "ORA nnnn", "ASL nnnn", "SLO nnnn",
    /* 0x10 */ "BPL nn", "ORA (nn),Y", "???", "SLO (nn),Y", "NOP nn,X", "ORA nn,X", "ASL nn,X", "SLO nn,X",
    /* 0x18 */ "CLC", "ORA nnnn,Y", "NOP", "SLO nnnn,Y", "NOP nnnn,X", "ORA nnnn,X", "ASL nnnn,X", "SLO nnnn,X",
    /* 0x20 */ "JSR nnnn", "AND (nn,X)", "???", "RLA (nn,X)", "BIT nn", "AND nn", "ROL nn", "RLA nn",
    /* 0x28 */ "PLP", "AND #nn", "ROL", "ANC #nn", "BIT nnnn", "AND nnnn", "ROL nnnn", "RLA nnnn",
    /* 0x30 */ "BMI nn", "AND (nn),Y", "???", "RLA (nn),Y", "NOP nn,X", "AND nn,X", "ROL nn,X", "RLA nn,X",
    /* 0x38 */ "SEC", "AND nnnn,Y", "NOP", "RLA nnnn,Y", "NOP nnnn,X", "AND nnnn,X", "ROL nnnn,X", "RLA nnnn,X",
    /* 0x40 */ "RTI", "EOR (nn,X)", "???", "SRE (nn,X)", "NOP nn", "EOR nn", "LSR nn", "SRE nn",
    /* 0x48 */ "PHA", "EOR #nn", "LSR", "ASR #nn", "JMP nnnn", "EOR nnnn", "LSR nnnn", "SRE nnnn",
    /* 0x50 */ "BVC nn", "EOR (nn),Y", "???", "SRE (nn),Y", "NOP nn,X", "EOR nn,X", "LSR nn,X", "SRE nn,X",
    /* 0x58 */ "CLI", "EOR nnnn,Y", "NOP", "SRE nnnn,Y", "NOP nnnn,X", "EOR nnnn,X", "LSR nnnn,X", "SRE nnnn,X",
    /* 0x60 */ "RTS", "ADC (nn,X)", "???", "RRA (nn,X)", "NOP nn", "ADC nn", "ROR nn", "RRA nn",
    /* 0x68 */ "PLA", "ADC #nn", "ROR", "ARR #nn", "JMP (nnnn)", "ADC nnnn", "ROR nnnn", "RRA nnnn",
    /* 0x70 */ "BVS nn", "ADC (nn),Y", "???", "RRA (nn),Y", "NOP nn,X", "ADC nn,X", "ROR nn,X", "RRA nn,X",
    /* 0x78 */ "SEI", "ADC nnnn,Y", "NOP", "RRA nnnn,Y", "NOP nnnn,X", "ADC nnnn,X", "ROR nnnn,X", "RRA nnnn,X",
    /* 0x80 */ "NOP #nn", "STA (nn,X)", "NOP #nn", "SAX (nn,X)", "STY nn", "STA nn", "STX nn", "SAX nn",
    /* 0x88 */ "DEY", "NOP #nn", "TXA", "ANE #nn", "STY nnnn", "STA nnnn", "STX nnnn", "SAX nnnn",
    /* 0x90 */ "BCC nn", "STA (nn),Y", "???", "SHA (nn),Y", "STY nn,X", "STA nn,X", "STX nn,Y", "SAX nn,Y",
    /* 0x98 */ "TYA", "STA nnnn,Y", "TXS", "SHS nnnn,Y", "SHY nnnn,X", "STA nnnn,X", "SHX nnnn,Y", "SHA nnnn,Y",
    /* 0xA0 */ "LDY #nn", "LDA (nn,X)", "LDX #nn", "LAX (nn,X)", "LDY nn", "LDA nn", "LDX nn", "LAX nn",
    /* 0xA8 */ "TAY", "LDA #nn", "TAX", "LXA #nn", "LDY nnnn", "LDA nnnn", "LDX nnnn", "LAX nnnn",
    /* 0xB0 */ "BCS nn", "LDA (nn),Y", "???", "LAX (nn),Y", "LDY nn,X", "LDA nn,X", "LDX nn,Y", "LAX nn,Y",
    /* 0xB8 */ "CLV", "LDA nnnn,Y", "TSX", "LAS nnnn,Y", "LDY nnnn,X", "LDA nnnn,X", "LDX nnnn,Y", "LAX nnnn,Y",
    /* 0xC0 */ "CPY #nn", "CMP (nn,X)", "NOP #nn", "DCP (nn,X)", "CPY nn", "CMP nn", "DEC nn", "DCP nn",
    /* 0xC8 */ "INY", "CMP #nn", "DEX", "SBX #nn", "CPY nnnn", "CMP nnnn", "DEC nnnn", "DCP nnnn",
    /* 0xD0 */ "BNE nn", "CMP (nn),Y", "???", "DCP (nn),Y", "NOP nn,X", "CMP nn,X", "DEC nn,X", "DCP nn,X",
    /* 0xD8 */ "CLD", "CMP nnnn,Y", "NOP", "DCP nnnn,Y", "NOP nnnn,X", "CMP nnnn,X", "DEC nnnn,X", "DCP nnnn,X",
    /* 0xE0 */ "CPX #nn", "SBC (nn,X)", "NOP #nn", "ISB (nn,X)", "CPX nn", "SBC nn", "INC nn", "ISB nn",
    /* 0xE8 */ "INX", "SBC #nn", "NOP", "SBC #nn", "CPX nnnn", "SBC nnnn", "INC nnnn", "ISB nnnn",
    /* 0xF0 */ "BEQ nn", "SBC (nn),Y", "???", "ISB (nn),Y", "NOP nn,X", "SBC nn,X", "INC nn,X", "ISB nn,X",
    /* 0xF8 */ "SED", "SBC nnnn,Y", "NOP", "ISB nnnn,Y", "NOP nnnn,X", "SBC nnnn,X", "INC nnnn,X", "ISB nnnn,X",
    /* INTERRUPT_ID */ "INT",
    /* RESET_ID */ "RST",
];

pub fn builtin() -> Vec<Descriptor> {
    DESCRIPTORS
        .iter()
        .enumerate()
        .map(|(id, text)| Descriptor::new(id as u16, text))
        .collect()
}

/// Make sure a descriptor list has exactly one entry per table id, in order.
pub fn validate(list: &[Descriptor]) -> Result<(), Error> {
    if list.len() != ENTRY_COUNT {
        return Err(Error::new(
            ErrorKind::Descriptor,
            None,
            format!("expected {} descriptors but found {}", ENTRY_COUNT, list.len()).as_str(),
        ));
    }
    if let Some((i, d)) = list.iter().enumerate().find(|(i, d)| d.id as usize != *i) {
        return Err(Error::new(
            ErrorKind::Descriptor,
            None,
            format!("descriptor {} has id 0x{:02X}; expected 0x{:02X}", i, d.id, i).as_str(),
        ));
    }
    Ok(())
}

/// Parse a descriptor list from lines of text.
///
/// Each line holds an id and a descriptor, e.g. `0x6C JMP (nnnn)`. Ids may be written as
/// `0x6C`, `$6C`, `6Ch` (any case) or in decimal. Blank lines and `;` comments are ignored.
pub fn from_str_iter<I, T>(iter: I) -> Result<Vec<Descriptor>, Error>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut list = Vec::new();
    for (n, line) in iter.into_iter().enumerate() {
        let line = line.as_ref();
        if RE_COMMENT_OR_BLANK_LINE.is_match(line) {
            continue;
        }
        let caps = RE_LINE
            .captures(line)
            .ok_or_else(|| descriptor_err_line!(n + 1, "expected <id> <mnemonic> [operand]"))?;
        let digits = caps.get(2).map_or("", |m| m.as_str());
        let hex = caps.get(1).is_some() || caps.get(3).is_some();
        let id = if hex {
            u16::from_str_radix(digits, 16)
        } else {
            digits.parse::<u16>()
        }
        .map_err(|_| descriptor_err_line!(n + 1, format!("invalid id \"{}\"", digits)))?;
        let mut text = caps.get(4).map_or("", |m| m.as_str()).to_string();
        if let Some(operand) = caps.get(5).filter(|m| !m.as_str().is_empty()) {
            text.push(' ');
            text.push_str(operand.as_str());
        }
        list.push(Descriptor { id, text });
    }
    validate(&list)?;
    Ok(list)
}

pub fn read_from_file(path: &Path) -> Result<Vec<Descriptor>, Error> {
    let lines = BufReader::new(File::open(path)?)
        .lines()
        .collect::<Result<Vec<String>, io::Error>>()?;
    from_str_iter(lines)
}
