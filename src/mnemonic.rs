//! The closed set of instruction names and what the generator needs to know about each.
use super::micro_op::MicroOp;
use std::fmt;

macro_rules! mnemonics {
    ($($variant:ident => $name:literal,)+) => {
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Mnemonic {
            $($variant,)+
        }
        impl Mnemonic {
            #[cfg(test)]
            pub const ALL: &'static [Mnemonic] = &[$(Mnemonic::$variant,)+];
            pub fn name(&self) -> &'static str {
                match self {
                    $(Mnemonic::$variant => $name,)+
                }
            }
            /// the given string must be uppercase
            pub fn from_str(name: &str) -> Option<Mnemonic> {
                match name {
                    $($name => Some(Mnemonic::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

mnemonics! {
    ADC => "ADC", AND => "AND", ASL => "ASL", BCC => "BCC", BCS => "BCS", BEQ => "BEQ",
    BIT => "BIT", BMI => "BMI", BNE => "BNE", BPL => "BPL", BRK => "BRK", BVC => "BVC",
    BVS => "BVS", CLC => "CLC", CLD => "CLD", CLI => "CLI", CLV => "CLV", CMP => "CMP",
    CPX => "CPX", CPY => "CPY", DEC => "DEC", DEX => "DEX", DEY => "DEY", EOR => "EOR",
    INC => "INC", INX => "INX", INY => "INY", JMP => "JMP", JSR => "JSR", LDA => "LDA",
    LDX => "LDX", LDY => "LDY", LSR => "LSR", NOP => "NOP", ORA => "ORA", PHA => "PHA",
    PHP => "PHP", PLA => "PLA", PLP => "PLP", ROL => "ROL", ROR => "ROR", RTI => "RTI",
    RTS => "RTS", SBC => "SBC", SEC => "SEC", SED => "SED", SEI => "SEI", STA => "STA",
    STX => "STX", STY => "STY", TAX => "TAX", TAY => "TAY", TSX => "TSX", TXA => "TXA",
    TXS => "TXS", TYA => "TYA",
    /****** undocumented ******/
    ANC => "ANC", ANE => "ANE", ARR => "ARR", ASR => "ASR", DCP => "DCP", ISB => "ISB",
    LAS => "LAS", LAX => "LAX", LXA => "LXA", RLA => "RLA", RRA => "RRA", SAX => "SAX",
    SBX => "SBX", SHA => "SHA", SHS => "SHS", SHX => "SHX", SHY => "SHY", SLO => "SLO",
    SRE => "SRE",
    /****** pseudo-opcodes ******/
    INT => "INT", RST => "RST",
    // an opcode that halts or otherwise has no defined behavior
    Illegal => "???",
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Groups mnemonics by the shape of micro-op sequence they produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Class {
    Branch,
    Jump,
    Subroutine,
    Break,
    Interrupt,
    Reset,
    Return,
    ReturnFromInterrupt,
    Push,
    Pull,
    /// flag set/clear, register increment/decrement and register transfers
    Register,
    /// ASL, LSR, ROL, ROR: accumulator or read-modify-write on memory
    Shift,
    /// INC, DEC and the fused shift/arithmetic undocumented opcodes
    ReadModifyWrite,
    Store,
    /// SHA, SHS, SHX, SHY: the stored value depends on the address high byte
    UnstableStore,
    Read,
    Nop,
    Illegal,
}

/// How an instruction treats its memory operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteClass {
    /// loaded into the temporary latch, never written
    ReadOnly,
    /// written once, never loaded
    Store,
    /// loaded, written back unmodified, then written back with the result
    ReadModifyWrite,
}

/// Index register used by an indexed addressing mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Index {
    X,
    Y,
}

impl Mnemonic {
    pub fn class(&self) -> Class {
        use Mnemonic::*;
        match self {
            BCC | BCS | BEQ | BMI | BNE | BPL | BVC | BVS => Class::Branch,
            JMP => Class::Jump,
            JSR => Class::Subroutine,
            BRK => Class::Break,
            INT => Class::Interrupt,
            RST => Class::Reset,
            RTS => Class::Return,
            RTI => Class::ReturnFromInterrupt,
            PHA | PHP => Class::Push,
            PLA | PLP => Class::Pull,
            CLC | CLD | CLI | CLV | SEC | SED | SEI | DEX | DEY | INX | INY | TAX | TAY | TSX | TXA | TXS | TYA => {
                Class::Register
            }
            ASL | LSR | ROL | ROR => Class::Shift,
            INC | DEC | SLO | RLA | SRE | RRA | DCP | ISB => Class::ReadModifyWrite,
            STA | STX | STY | SAX => Class::Store,
            SHA | SHS | SHX | SHY => Class::UnstableStore,
            NOP => Class::Nop,
            Illegal => Class::Illegal,
            ADC | AND | BIT | CMP | CPX | CPY | EOR | LDA | LDX | LDY | ORA | SBC | ANC | ANE | ARR | ASR | LAS
            | LAX | LXA | SBX => Class::Read,
        }
    }
    pub fn write_class(&self) -> WriteClass {
        match self.class() {
            Class::Shift | Class::ReadModifyWrite => WriteClass::ReadModifyWrite,
            Class::Store | Class::UnstableStore => WriteClass::Store,
            _ => WriteClass::ReadOnly,
        }
    }
    /// The micro-op that performs this instruction's own operation, if it has exactly one.
    /// Fused undocumented opcodes have none; see `fused_ops`.
    pub fn op(&self) -> Option<MicroOp> {
        use Mnemonic::*;
        Some(match self {
            ADC => MicroOp::Adc,
            AND => MicroOp::And,
            ASL => MicroOp::Asl,
            BCC => MicroOp::Bcc,
            BCS => MicroOp::Bcs,
            BEQ => MicroOp::Beq,
            BIT => MicroOp::Bit,
            BMI => MicroOp::Bmi,
            BNE => MicroOp::Bne,
            BPL => MicroOp::Bpl,
            BRK => MicroOp::Brk,
            BVC => MicroOp::Bvc,
            BVS => MicroOp::Bvs,
            CLC => MicroOp::Clc,
            CLD => MicroOp::Cld,
            CLI => MicroOp::Cli,
            CLV => MicroOp::Clv,
            CMP => MicroOp::Cmp,
            CPX => MicroOp::Cpx,
            CPY => MicroOp::Cpy,
            DEC => MicroOp::Dec,
            DEX => MicroOp::Dex,
            DEY => MicroOp::Dey,
            EOR => MicroOp::Eor,
            INC => MicroOp::Inc,
            INX => MicroOp::Inx,
            INY => MicroOp::Iny,
            LDA => MicroOp::Lda,
            LDX => MicroOp::Ldx,
            LDY => MicroOp::Ldy,
            LSR => MicroOp::Lsr,
            ORA => MicroOp::Ora,
            ROL => MicroOp::Rol,
            ROR => MicroOp::Ror,
            SBC => MicroOp::Sbc,
            SEC => MicroOp::Sec,
            SED => MicroOp::Sed,
            SEI => MicroOp::Sei,
            STA => MicroOp::Sta,
            STX => MicroOp::Stx,
            STY => MicroOp::Sty,
            TAX => MicroOp::Tax,
            TAY => MicroOp::Tay,
            TSX => MicroOp::Tsx,
            TXA => MicroOp::Txa,
            TXS => MicroOp::Txs,
            TYA => MicroOp::Tya,
            ANC => MicroOp::Anc,
            ANE => MicroOp::Ane,
            ARR => MicroOp::Arr,
            LAS => MicroOp::Las,
            LAX => MicroOp::Lax,
            LXA => MicroOp::Lxa,
            SAX => MicroOp::Sax,
            SBX => MicroOp::Sbx,
            INT => MicroOp::Interrupt,
            RST => MicroOp::Reset,
            Illegal => MicroOp::InvalidOpcode,
            ASR | DCP | ISB | RLA | RRA | SLO | SRE | SHA | SHS | SHX | SHY | JMP | JSR | NOP | PHA | PHP | PLA
            | PLP | RTI | RTS => return None,
        })
    }
    /// Undocumented read-modify-write opcodes run a shift (or increment/decrement)
    /// on memory and then feed the result to a second ALU operation.
    pub fn fused_ops(&self) -> Option<(MicroOp, MicroOp)> {
        use Mnemonic::*;
        match self {
            SLO => Some((MicroOp::Asl, MicroOp::Ora)),
            RLA => Some((MicroOp::Rol, MicroOp::And)),
            SRE => Some((MicroOp::Lsr, MicroOp::Eor)),
            RRA => Some((MicroOp::Ror, MicroOp::Adc)),
            DCP => Some((MicroOp::Dec, MicroOp::Cmp)),
            ISB => Some((MicroOp::Inc, MicroOp::Sbc)),
            _ => None,
        }
    }
    /// Undocumented ALU opcodes that only exist with an immediate operand.
    pub fn is_immediate_only(&self) -> bool {
        use Mnemonic::*;
        matches!(self, ANC | ANE | ARR | ASR | LXA | SBX)
    }
    /// The SH* opcodes each have a dedicated indexing micro-op that also computes the stored value.
    pub fn unstable_index_op(&self, index: Index) -> Option<MicroOp> {
        match (self, index) {
            (Mnemonic::SHY, Index::X) => Some(MicroOp::AddrXShy),
            (Mnemonic::SHA, Index::Y) => Some(MicroOp::AddrYSha),
            (Mnemonic::SHS, Index::Y) => Some(MicroOp::AddrYShs),
            (Mnemonic::SHX, Index::Y) => Some(MicroOp::AddrYShx),
            _ => None,
        }
    }
}
