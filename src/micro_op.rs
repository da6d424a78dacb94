//! The micro-op vocabulary shared between this generator and the execution engine.
//!
//! Each micro-op is one clock cycle of work for the interpreter. The numeric codes
//! are the wire format: the engine indexes its dispatch on them, so adding, removing
//! or reordering a variant is a breaking change to every emitted table.
use std::fmt;

macro_rules! micro_ops {
    ($($variant:ident = $code:literal => $name:literal,)+) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum MicroOp {
            $($variant = $code,)+
        }
        impl MicroOp {
            /// Every micro-op in code order.
            pub const ALL: &'static [MicroOp] = &[$(MicroOp::$variant,)+];
            /// The name used by the execution engine's sources (e.g. `CPU_OP_RD_L`).
            pub fn name(&self) -> &'static str {
                match self {
                    $(MicroOp::$variant => $name,)+
                }
            }
            pub fn from_code(code: u8) -> Option<MicroOp> {
                match code {
                    $($code => Some(MicroOp::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

micro_ops! {
    RdOpcode = 0 => "CPU_OP_RD_OPCODE",
    RdTmp = 1 => "CPU_OP_RD_TMP",
    RdTmpNoDebug = 2 => "CPU_OP_RD_TMP_NODEBUG",
    RdL = 3 => "CPU_OP_RD_L",
    RdH = 4 => "CPU_OP_RD_H",
    LdTmpMem = 5 => "CPU_OP_LD_TMP_MEM",
    LdMemTmp = 6 => "CPU_OP_LD_MEM_TMP",
    LdMemTmpNoDebug = 7 => "CPU_OP_LD_MEM_TMP_NODEBUG",
    LdHMemP1LTmp = 8 => "CPU_OP_LD_H_MEMP1_L_TMP",
    LdDummyMemPc = 9 => "CPU_OP_LD_DUMMY_MEM_PC",
    LdDummyMemSp = 10 => "CPU_OP_LD_DUMMY_MEM_SP",
    PushTmp = 11 => "CPU_OP_PUSH_TMP",
    PopTmp = 12 => "CPU_OP_POP_TMP",
    PushPcl = 13 => "CPU_OP_PUSH_PCL",
    PopPcl = 14 => "CPU_OP_POP_PCL",
    PushPch = 15 => "CPU_OP_PUSH_PCH",
    PopPch = 16 => "CPU_OP_POP_PCH",
    DecSp = 17 => "CPU_OP_DEC_SP",
    LdTmpSr = 18 => "CPU_OP_LD_TMP_SR",
    LdTmpA = 19 => "CPU_OP_LD_TMP_A",
    LdPcHl = 20 => "CPU_OP_LD_PC_HL",
    LdSrTmp = 21 => "CPU_OP_LD_SR_TMP",
    LdATmp = 22 => "CPU_OP_LD_A_TMP",
    AddrX = 23 => "CPU_OP_ADDR_X",
    AddrXSlow = 24 => "CPU_OP_ADDR_X_SLOW",
    AddrXZeroPage = 25 => "CPU_OP_ADDR_X_ZEROPAGE",
    AddrXShy = 26 => "CPU_OP_ADDR_X_SHY",
    AddrY = 27 => "CPU_OP_ADDR_Y",
    AddrYSlow = 28 => "CPU_OP_ADDR_Y_SLOW",
    AddrYZeroPage = 29 => "CPU_OP_ADDR_Y_ZEROPAGE",
    AddrYSha = 30 => "CPU_OP_ADDR_Y_SHA",
    AddrYShs = 31 => "CPU_OP_ADDR_Y_SHS",
    AddrYShx = 32 => "CPU_OP_ADDR_Y_SHX",
    SetNz = 33 => "CPU_OP_SET_NZ",
    Adc = 34 => "CPU_OP_ADC",
    Anc = 35 => "CPU_OP_ANC",
    And = 36 => "CPU_OP_AND",
    Ane = 37 => "CPU_OP_ANE",
    Arr = 38 => "CPU_OP_ARR",
    Asl = 39 => "CPU_OP_ASL",
    Bcc = 40 => "CPU_OP_BCC",
    Bcs = 41 => "CPU_OP_BCS",
    Beq = 42 => "CPU_OP_BEQ",
    Bit = 43 => "CPU_OP_BIT",
    Bmi = 44 => "CPU_OP_BMI",
    Bne = 45 => "CPU_OP_BNE",
    Bpl = 46 => "CPU_OP_BPL",
    Brk = 47 => "CPU_OP_BRK",
    Bvc = 48 => "CPU_OP_BVC",
    Bvs = 49 => "CPU_OP_BVS",
    Clc = 50 => "CPU_OP_CLC",
    Cld = 51 => "CPU_OP_CLD",
    Cli = 52 => "CPU_OP_CLI",
    Clv = 53 => "CPU_OP_CLV",
    Cmp = 54 => "CPU_OP_CMP",
    Cpx = 55 => "CPU_OP_CPX",
    Cpy = 56 => "CPU_OP_CPY",
    Dec = 57 => "CPU_OP_DEC",
    Dex = 58 => "CPU_OP_DEX",
    Dey = 59 => "CPU_OP_DEY",
    Eor = 60 => "CPU_OP_EOR",
    Inc = 61 => "CPU_OP_INC",
    Interrupt = 62 => "CPU_OP_INTERRUPT",
    Inx = 63 => "CPU_OP_INX",
    Iny = 64 => "CPU_OP_INY",
    JmpRelative = 65 => "CPU_OP_JMP_RELATIVE",
    Las = 66 => "CPU_OP_LAS",
    Lax = 67 => "CPU_OP_LAX",
    Lda = 68 => "CPU_OP_LDA",
    Ldx = 69 => "CPU_OP_LDX",
    Ldy = 70 => "CPU_OP_LDY",
    Lsr = 71 => "CPU_OP_LSR",
    Lxa = 72 => "CPU_OP_LXA",
    Ora = 73 => "CPU_OP_ORA",
    Reset = 74 => "CPU_OP_RESET",
    Rol = 75 => "CPU_OP_ROL",
    Ror = 76 => "CPU_OP_ROR",
    Sax = 77 => "CPU_OP_SAX",
    Sbc = 78 => "CPU_OP_SBC",
    Sbx = 79 => "CPU_OP_SBX",
    Sec = 80 => "CPU_OP_SEC",
    Sed = 81 => "CPU_OP_SED",
    Sei = 82 => "CPU_OP_SEI",
    Sta = 83 => "CPU_OP_STA",
    Stx = 84 => "CPU_OP_STX",
    Sty = 85 => "CPU_OP_STY",
    Tax = 86 => "CPU_OP_TAX",
    Tay = 87 => "CPU_OP_TAY",
    Tsx = 88 => "CPU_OP_TSX",
    Txa = 89 => "CPU_OP_TXA",
    Txs = 90 => "CPU_OP_TXS",
    Tya = 91 => "CPU_OP_TYA",
    InvalidOpcode = 92 => "CPU_OP_INVALID_OPCODE",
}

impl MicroOp {
    pub fn code(&self) -> u8 { *self as u8 }
}

impl fmt::Display for MicroOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dense_and_ordered() {
        assert_eq!(MicroOp::ALL.len(), 93);
        for (i, op) in MicroOp::ALL.iter().enumerate() {
            assert_eq!(op.code() as usize, i);
            assert_eq!(MicroOp::from_code(i as u8), Some(*op));
        }
        assert_eq!(MicroOp::from_code(93), None);
    }
    #[test]
    fn names_match_engine_constants() {
        assert_eq!(MicroOp::RdOpcode.name(), "CPU_OP_RD_OPCODE");
        assert_eq!(MicroOp::LdHMemP1LTmp.name(), "CPU_OP_LD_H_MEMP1_L_TMP");
        assert_eq!(MicroOp::InvalidOpcode.code(), 92);
        assert_eq!(format!("{:>12}", MicroOp::RdL), " CPU_OP_RD_L");
    }
}
