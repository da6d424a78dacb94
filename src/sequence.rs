//! Builds the cycle-by-cycle micro-op sequence for a classified instruction.
//!
//! Sequences are chosen by looking up the instruction's class and addressing mode in
//! `RULES`. Most memory instructions share an address-calculation prefix followed by an
//! operand phase that depends on how the instruction treats memory:
//!
//!  1. read-only: load the operand into the temporary latch, then run the ALU op
//!  2. store: write directly, no load
//!  3. read-modify-write: load, write the unmodified value back (the hardware really
//!     does this), run the op(s), write the result
//!
//! Control flow, stack and interrupt instructions have sequences of their own.
use super::classify::{AddressingMode, Instruction};
use super::micro_op::MicroOp;
use super::mnemonic::{Class, Index, Mnemonic, WriteClass};
use super::table::SLOTS;
use super::*;

/// The micro-ops of one instruction, in execution order, before padding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    ops: Vec<MicroOp>,
}
impl Sequence {
    pub fn new() -> Self { Sequence { ops: Vec::new() } }
    pub fn len(&self) -> usize { self.ops.len() }
    pub fn is_empty(&self) -> bool { self.ops.is_empty() }
    pub fn ops(&self) -> &[MicroOp] { &self.ops }
    pub fn push(&mut self, op: MicroOp) -> &mut Self {
        self.ops.push(op);
        self
    }
    pub fn extend(&mut self, ops: &[MicroOp]) -> &mut Self {
        self.ops.extend_from_slice(ops);
        self
    }
}
impl From<&[MicroOp]> for Sequence {
    fn from(ops: &[MicroOp]) -> Self { Sequence { ops: ops.to_vec() } }
}
impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.ops.iter().map(|op| op.name()).collect();
        write!(f, "{}", names.join(" "))
    }
}

type Rule = fn(&Instruction) -> Result<Sequence, Error>;

/// The set of addressing modes a rule covers.
#[derive(Debug, Clone, Copy)]
enum Modes {
    Only(AddressingMode),
    /// any mode for which AddressingMode::is_memory is true
    Memory,
}
impl Modes {
    fn contains(&self, am: AddressingMode) -> bool {
        match self {
            Modes::Only(m) => *m == am,
            Modes::Memory => am.is_memory(),
        }
    }
}

use AddressingMode as AM;
const RULES: &[(Class, Modes, Rule)] = &[
    (Class::Branch, Modes::Only(AM::Relative), branch),
    (Class::Jump, Modes::Only(AM::Absolute), jump_absolute),
    (Class::Jump, Modes::Only(AM::IndirectAbsolute), jump_indirect),
    (Class::Subroutine, Modes::Only(AM::Absolute), jump_subroutine),
    (Class::Break, Modes::Only(AM::Implied), brk),
    (Class::Interrupt, Modes::Only(AM::Implied), interrupt),
    (Class::Reset, Modes::Only(AM::Implied), reset),
    (Class::Return, Modes::Only(AM::Implied), return_from_subroutine),
    (Class::ReturnFromInterrupt, Modes::Only(AM::Implied), return_from_interrupt),
    (Class::Push, Modes::Only(AM::Implied), push),
    (Class::Pull, Modes::Only(AM::Implied), pull),
    (Class::Register, Modes::Only(AM::Implied), single),
    (Class::Illegal, Modes::Only(AM::Implied), single),
    (Class::Shift, Modes::Only(AM::Implied), shift_accumulator),
    (Class::Shift, Modes::Memory, read_modify_write),
    (Class::ReadModifyWrite, Modes::Memory, read_modify_write),
    (Class::Store, Modes::Memory, store),
    (Class::UnstableStore, Modes::Memory, unstable_store),
    (Class::Read, Modes::Only(AM::Immediate), read_immediate),
    (Class::Read, Modes::Memory, read),
    (Class::Nop, Modes::Only(AM::Implied), nop),
    (Class::Nop, Modes::Only(AM::Immediate), nop_immediate),
    (Class::Nop, Modes::Memory, nop_memory),
];

fn find_rule(class: Class, am: AddressingMode) -> Option<Rule> {
    RULES
        .iter()
        .find(|(c, modes, _)| *c == class && modes.contains(am))
        .map(|(_, _, rule)| *rule)
}

/// Build the micro-op sequence for an instruction.
pub fn build(inst: &Instruction) -> Result<Sequence, Error> {
    let rule = find_rule(inst.class(), inst.mode)
        .ok_or_else(|| inst_err!("no sequence for {} with {:?} addressing", inst.mnemonic, inst.mode))?;
    let seq = rule(inst)?;
    if seq.is_empty() || seq.len() > SLOTS {
        return Err(general_err!(format!(
            "sequence for {} has {} micro-ops; must be 1 to {}",
            inst, seq.len(), SLOTS
        )));
    }
    Ok(seq)
}

fn own_op(m: Mnemonic) -> Result<MicroOp, Error> {
    m.op().ok_or_else(|| general_err!(format!("{} has no micro-op of its own", m)))
}

//
// address calculation
//
fn index_op(m: Mnemonic, index: Index) -> Result<MicroOp, Error> {
    if m.class() == Class::UnstableStore {
        return m
            .unstable_index_op(index)
            .ok_or_else(|| inst_err!("{} can't be indexed by {:?}", m, index));
    }
    // writes can't be undone, so they always wait for the high byte fix-up
    Ok(match (m.write_class(), index) {
        (WriteClass::ReadOnly, Index::X) => MicroOp::AddrX,
        (WriteClass::ReadOnly, Index::Y) => MicroOp::AddrY,
        (_, Index::X) => MicroOp::AddrXSlow,
        (_, Index::Y) => MicroOp::AddrYSlow,
    })
}
/// The address-calculation phase shared by every memory operand instruction.
fn address_prefix(inst: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    let mut seq = Sequence::new();
    match inst.mode {
        AM::ZeroPage => seq.push(RdL),
        AM::ZeroPageIndexedX => seq.extend(&[RdL, AddrXZeroPage]),
        AM::ZeroPageIndexedY => seq.extend(&[RdL, AddrYZeroPage]),
        AM::Absolute => seq.extend(&[RdL, RdH]),
        AM::AbsoluteIndexedX => seq.extend(&[RdL, RdH, index_op(inst.mnemonic, Index::X)?]),
        AM::AbsoluteIndexedY => seq.extend(&[RdL, RdH, index_op(inst.mnemonic, Index::Y)?]),
        AM::IndirectIndexedY => seq.extend(&[RdL, LdTmpMem, LdHMemP1LTmp, index_op(inst.mnemonic, Index::Y)?]),
        AM::IndexedIndirectX => seq.extend(&[RdL, AddrXZeroPage, LdTmpMem, LdHMemP1LTmp]),
        _ => return Err(mode_err!("{:?} doesn't address memory", inst.mode)),
    };
    Ok(seq)
}

//
// operand phase
//
fn read(inst: &Instruction) -> Result<Sequence, Error> {
    let mut seq = address_prefix(inst)?;
    seq.push(MicroOp::LdTmpMem).push(own_op(inst.mnemonic)?);
    Ok(seq)
}
fn read_immediate(inst: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    let mut seq = Sequence::new();
    seq.push(RdTmp);
    if inst.mnemonic == Mnemonic::ASR {
        // AND with the operand, then shift the accumulator right
        seq.extend(&[And, LdTmpA, Lsr, LdATmp]);
    } else {
        seq.push(own_op(inst.mnemonic)?);
    }
    Ok(seq)
}
fn store(inst: &Instruction) -> Result<Sequence, Error> {
    let mut seq = address_prefix(inst)?;
    seq.push(own_op(inst.mnemonic)?);
    Ok(seq)
}
fn unstable_store(inst: &Instruction) -> Result<Sequence, Error> {
    // the SH* index op leaves the value to store in the temporary latch
    let mut seq = address_prefix(inst)?;
    seq.push(MicroOp::LdMemTmp);
    Ok(seq)
}
fn read_modify_write(inst: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    let mut seq = address_prefix(inst)?;
    seq.extend(&[LdTmpMem, LdMemTmpNoDebug]);
    match inst.mnemonic.fused_ops() {
        Some((first, second)) => seq.extend(&[first, second]),
        None => seq.push(own_op(inst.mnemonic)?),
    };
    seq.push(LdMemTmp);
    Ok(seq)
}
fn nop(_: &Instruction) -> Result<Sequence, Error> { Ok(Sequence::from(&[MicroOp::LdDummyMemPc][..])) }
fn nop_immediate(_: &Instruction) -> Result<Sequence, Error> { Ok(Sequence::from(&[MicroOp::RdTmp][..])) }
fn nop_memory(inst: &Instruction) -> Result<Sequence, Error> {
    // the bus read happens; the value is ignored
    let mut seq = address_prefix(inst)?;
    seq.push(MicroOp::LdTmpMem);
    Ok(seq)
}

//
// single byte instructions
//
fn single(inst: &Instruction) -> Result<Sequence, Error> {
    let mut seq = Sequence::new();
    seq.push(own_op(inst.mnemonic)?);
    Ok(seq)
}
fn shift_accumulator(inst: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    let mut seq = Sequence::new();
    seq.extend(&[LdTmpA, own_op(inst.mnemonic)?, LdATmp, LdDummyMemPc]);
    Ok(seq)
}
fn push(inst: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    let load = match inst.mnemonic {
        Mnemonic::PHA => LdTmpA,
        Mnemonic::PHP => LdTmpSr,
        m => return Err(inst_err!("{} is not a push", m)),
    };
    Ok(Sequence::from(&[LdDummyMemPc, load, PushTmp][..]))
}
fn pull(inst: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    let mut seq = Sequence::from(&[LdDummyMemPc, LdDummyMemSp, PopTmp][..]);
    match inst.mnemonic {
        Mnemonic::PLA => seq.extend(&[SetNz, LdATmp]),
        Mnemonic::PLP => seq.push(LdSrTmp),
        m => return Err(inst_err!("{} is not a pull", m)),
    };
    Ok(seq)
}

//
// control flow
//
fn branch(inst: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    let mut seq = Sequence::new();
    // JmpRelative takes an extra cycle internally when the target is on another page
    seq.extend(&[RdL, own_op(inst.mnemonic)?, JmpRelative]);
    Ok(seq)
}
fn jump_absolute(_: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    Ok(Sequence::from(&[RdL, RdH, LdPcHl][..]))
}
fn jump_indirect(_: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    Ok(Sequence::from(&[RdL, RdH, LdTmpMem, LdHMemP1LTmp, LdPcHl][..]))
}
fn jump_subroutine(_: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    Ok(Sequence::from(&[RdL, LdDummyMemSp, PushPch, PushPcl, RdH, LdPcHl][..]))
}
fn return_from_subroutine(_: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    Ok(Sequence::from(&[LdDummyMemPc, LdDummyMemSp, PopPcl, PopPch, RdTmpNoDebug][..]))
}
fn return_from_interrupt(_: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    Ok(Sequence::from(&[LdDummyMemPc, LdDummyMemSp, PopTmp, LdSrTmp, PopPcl, PopPch][..]))
}

//
// interrupts
//
// Brk and Interrupt leave the status byte to push (B set / B clear) in the temporary
// latch and point the address at the IRQ vector; Reset points it at the reset vector.
const LOAD_PC_FROM_VECTOR: &[MicroOp] = &[MicroOp::LdTmpMem, MicroOp::LdHMemP1LTmp, MicroOp::LdPcHl];
fn brk(_: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    let mut seq = Sequence::from(&[RdTmpNoDebug, PushPch, PushPcl, Brk, PushTmp][..]);
    seq.extend(LOAD_PC_FROM_VECTOR);
    Ok(seq)
}
fn interrupt(_: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    let mut seq = Sequence::from(&[LdDummyMemPc, LdDummyMemSp, PushPch, PushPcl, Interrupt, PushTmp][..]);
    seq.extend(LOAD_PC_FROM_VECTOR);
    Ok(seq)
}
fn reset(_: &Instruction) -> Result<Sequence, Error> {
    use MicroOp::*;
    // the stack pointer moves as if three bytes were pushed but nothing is written
    let mut seq = Sequence::from(&[DecSp, DecSp, Reset, DecSp][..]);
    seq.extend(LOAD_PC_FROM_VECTOR);
    Ok(seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use MicroOp::*;

    fn ops(text: &str) -> Vec<MicroOp> { build(&classify(text).unwrap()).unwrap().ops().to_vec() }

    #[test]
    fn every_accepted_combination_has_a_rule() {
        for &m in Mnemonic::ALL {
            for am in AddressingMode::ALL {
                let inst = Instruction { mnemonic: m, mode: am };
                if m.class().accepts(m, am) {
                    let seq = build(&inst).unwrap_or_else(|e| panic!("{} {:?}: {}", m, am, e));
                    assert!(seq.len() <= 9, "{} {:?} is {} ops", m, am, seq.len());
                }
            }
        }
    }
    #[test]
    fn addressing_prefixes() {
        assert_eq!(ops("LDA #nn"), vec![RdTmp, Lda]);
        assert_eq!(ops("LDA nn"), vec![RdL, LdTmpMem, Lda]);
        assert_eq!(ops("LDA nn,X"), vec![RdL, AddrXZeroPage, LdTmpMem, Lda]);
        assert_eq!(ops("LDX nn,Y"), vec![RdL, AddrYZeroPage, LdTmpMem, Ldx]);
        assert_eq!(ops("LDA nnnn"), vec![RdL, RdH, LdTmpMem, Lda]);
        assert_eq!(ops("LDA nnnn,X"), vec![RdL, RdH, AddrX, LdTmpMem, Lda]);
        assert_eq!(ops("LDA nnnn,Y"), vec![RdL, RdH, AddrY, LdTmpMem, Lda]);
        assert_eq!(ops("LDA (nn),Y"), vec![RdL, LdTmpMem, LdHMemP1LTmp, AddrY, LdTmpMem, Lda]);
        assert_eq!(ops("LDA (nn,X)"), vec![RdL, AddrXZeroPage, LdTmpMem, LdHMemP1LTmp, LdTmpMem, Lda]);
    }
    #[test]
    fn writes_always_pay_for_page_crossing() {
        assert_eq!(ops("STA nnnn,X"), vec![RdL, RdH, AddrXSlow, Sta]);
        assert_eq!(ops("STA (nn),Y"), vec![RdL, LdTmpMem, LdHMemP1LTmp, AddrYSlow, Sta]);
        assert_eq!(ops("INC nnnn,X"), vec![RdL, RdH, AddrXSlow, LdTmpMem, LdMemTmpNoDebug, Inc, LdMemTmp]);
        assert_eq!(ops("DCP nnnn,Y")[2], AddrYSlow);
    }
    #[test]
    fn stores_never_load() {
        // nothing is loaded once the address is resolved
        for text in ["STA nnnn", "STX nn", "STY nn,X", "SAX (nn,X)", "STA (nn),Y", "SHA nnnn,Y", "SHY nnnn,X"] {
            let seq = ops(text);
            assert_ne!(seq[seq.len() - 2], LdTmpMem, "{}", text);
        }
        assert_eq!(ops("STA nnnn"), vec![RdL, RdH, Sta]);
        assert_eq!(ops("SAX nn,Y"), vec![RdL, AddrYZeroPage, Sax]);
    }
    #[test]
    fn unstable_stores() {
        assert_eq!(ops("SHA (nn),Y"), vec![RdL, LdTmpMem, LdHMemP1LTmp, AddrYSha, LdMemTmp]);
        assert_eq!(ops("SHS nnnn,Y"), vec![RdL, RdH, AddrYShs, LdMemTmp]);
        assert_eq!(ops("SHY nnnn,X"), vec![RdL, RdH, AddrXShy, LdMemTmp]);
        assert_eq!(ops("SHX nnnn,Y"), vec![RdL, RdH, AddrYShx, LdMemTmp]);
    }
    #[test]
    fn read_modify_write_writes_twice() {
        let seq = ops("SLO nnnn");
        assert_eq!(seq, vec![RdL, RdH, LdTmpMem, LdMemTmpNoDebug, Asl, Ora, LdMemTmp]);
        let writes = seq.iter().filter(|op| matches!(op, LdMemTmp | LdMemTmpNoDebug)).count();
        assert_eq!(writes, 2);
        assert_eq!(ops("RLA nn")[3..], [Rol, And, LdMemTmp]);
        assert_eq!(ops("SRE nn")[3..], [Lsr, Eor, LdMemTmp]);
        assert_eq!(ops("RRA nn")[3..], [Ror, Adc, LdMemTmp]);
        assert_eq!(ops("DCP nn")[3..], [Dec, Cmp, LdMemTmp]);
        assert_eq!(ops("ISB nn")[3..], [Inc, Sbc, LdMemTmp]);
        assert_eq!(ops("ASL nn,X"), vec![RdL, AddrXZeroPage, LdTmpMem, LdMemTmpNoDebug, Asl, LdMemTmp]);
        // the longest sequence in the table
        assert_eq!(ops("ISB (nn),Y").len(), 9);
    }
    #[test]
    fn immediates() {
        assert_eq!(ops("ADC #nn"), vec![RdTmp, Adc]);
        assert_eq!(ops("ASR #nn"), vec![RdTmp, And, LdTmpA, Lsr, LdATmp]);
        assert_eq!(ops("NOP #nn"), vec![RdTmp]);
        assert_eq!(ops("SBX #nn"), vec![RdTmp, Sbx]);
    }
    #[test]
    fn nops() {
        assert_eq!(ops("NOP"), vec![LdDummyMemPc]);
        assert_eq!(ops("NOP nn"), vec![RdL, LdTmpMem]);
        assert_eq!(ops("NOP nnnn,X"), vec![RdL, RdH, AddrX, LdTmpMem]);
    }
    #[test]
    fn single_byte_instructions() {
        assert_eq!(ops("CLC"), vec![Clc]);
        assert_eq!(ops("INX"), vec![Inx]);
        assert_eq!(ops("TXS"), vec![Txs]);
        assert_eq!(ops("ROR"), vec![LdTmpA, Ror, LdATmp, LdDummyMemPc]);
        assert_eq!(ops("???"), vec![InvalidOpcode]);
    }
    #[test]
    fn stack_instructions() {
        assert_eq!(ops("PHA"), vec![LdDummyMemPc, LdTmpA, PushTmp]);
        assert_eq!(ops("PHP"), vec![LdDummyMemPc, LdTmpSr, PushTmp]);
        assert_eq!(ops("PLA"), vec![LdDummyMemPc, LdDummyMemSp, PopTmp, SetNz, LdATmp]);
        assert_eq!(ops("PLP"), vec![LdDummyMemPc, LdDummyMemSp, PopTmp, LdSrTmp]);
        assert_eq!(ops("RTS"), vec![LdDummyMemPc, LdDummyMemSp, PopPcl, PopPch, RdTmpNoDebug]);
        assert_eq!(ops("RTI"), vec![LdDummyMemPc, LdDummyMemSp, PopTmp, LdSrTmp, PopPcl, PopPch]);
    }
    #[test]
    fn control_flow() {
        assert_eq!(ops("BNE nn"), vec![RdL, Bne, JmpRelative]);
        assert_eq!(ops("JMP nnnn"), vec![RdL, RdH, LdPcHl]);
        assert_eq!(ops("JMP (nnnn)"), vec![RdL, RdH, LdTmpMem, LdHMemP1LTmp, LdPcHl]);
        assert_eq!(ops("JSR nnnn"), vec![RdL, LdDummyMemSp, PushPch, PushPcl, RdH, LdPcHl]);
    }
    #[test]
    fn interrupt_sequences() {
        assert_eq!(
            ops("BRK"),
            vec![RdTmpNoDebug, PushPch, PushPcl, Brk, PushTmp, LdTmpMem, LdHMemP1LTmp, LdPcHl]
        );
        assert_eq!(
            ops("INT"),
            vec![LdDummyMemPc, LdDummyMemSp, PushPch, PushPcl, Interrupt, PushTmp, LdTmpMem, LdHMemP1LTmp, LdPcHl]
        );
        let rst = ops("RST");
        assert_eq!(rst, vec![DecSp, DecSp, Reset, DecSp, LdTmpMem, LdHMemP1LTmp, LdPcHl]);
        assert!(!rst.iter().any(|op| matches!(op, PushPch | PushPcl | PushTmp)));
    }
    #[test]
    fn asr_with_memory_operand_is_an_invalid_instruction() {
        let mut list = crate::descriptor::builtin();
        list[0x4B] = crate::descriptor::Descriptor::new(0x4B, "ASR nn");
        let e = crate::table::Table::generate(&list).unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidInstruction);
        assert_eq!(e.ctx.map(|c| c.id), Some(0x4B));
    }
    #[test]
    fn unmatched_combination_is_rejected() {
        let inst = Instruction {
            mnemonic: Mnemonic::BNE,
            mode: AddressingMode::Absolute,
        };
        assert_eq!(build(&inst).unwrap_err().kind, ErrorKind::InvalidInstruction);
    }
}
