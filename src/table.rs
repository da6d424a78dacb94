//! The flat micro-op table handed to the execution engine.
//!
//! Every entry gets exactly `SLOTS` cells so the engine can find an instruction's
//! sequence at `table[id * SLOTS]`. The engine steps through the cells one per clock
//! until it reaches a fetch, then reads the next opcode. Unused cells are therefore
//! filled with fetches.
use super::classify::{classify, Instruction};
use super::descriptor::{self, Descriptor, ENTRY_COUNT};
use super::micro_op::MicroOp;
use super::sequence::{self, Sequence};
use super::*;

/// Cells per table entry.
pub const SLOTS: usize = 16;
/// Total number of cells in the table.
pub const TABLE_SIZE: usize = ENTRY_COUNT * SLOTS;

/// One table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// a micro-op of the entry's sequence
    Op(MicroOp),
    /// padding after the sequence; fetches the next opcode
    Fill,
    /// padding in the very last cell of the table. Same code as Fill, but nothing follows it.
    Terminal,
}
impl Slot {
    pub fn op(&self) -> MicroOp {
        match self {
            Slot::Op(op) => *op,
            Slot::Fill | Slot::Terminal => MicroOp::RdOpcode,
        }
    }
    pub fn code(&self) -> u8 { self.op().code() }
    pub fn is_padding(&self) -> bool { !matches!(self, Slot::Op(_)) }
}

/// A generated table entry.
#[derive(Debug, Clone)]
pub struct Entry {
    pub descriptor: Descriptor,
    pub instruction: Instruction,
    pub sequence: Sequence,
}

#[derive(Debug)]
pub struct Table {
    entries: Vec<Entry>,
    slots: Vec<Slot>,
}

impl Table {
    /// Generate the table for a complete descriptor list.
    /// Any classification or sequencing failure aborts generation.
    pub fn generate(list: &[Descriptor]) -> Result<Table, Error> {
        descriptor::validate(list)?;
        let mut entries = Vec::with_capacity(list.len());
        for d in list {
            let instruction = classify(&d.text).map_err(|e| e.at(d.id, &d.text))?;
            let sequence = sequence::build(&instruction).map_err(|e| e.at(d.id, &d.text))?;
            entries.push(Entry {
                descriptor: d.clone(),
                instruction,
                sequence,
            });
        }
        let mut slots = Vec::with_capacity(TABLE_SIZE);
        for e in entries.iter() {
            slots.extend(pad(&e.sequence));
        }
        // the last cell of the table doesn't lead on to another opcode boundary
        if let Some(last) = slots.last_mut() {
            if *last == Slot::Fill {
                *last = Slot::Terminal;
            }
        }
        Ok(Table { entries, slots })
    }
    pub fn builtin() -> Result<Table, Error> { Table::generate(&descriptor::builtin()) }

    pub fn entries(&self) -> &[Entry] { &self.entries }
    pub fn entry(&self, id: u16) -> Option<&Entry> { self.entries.get(id as usize) }
    pub fn slots(&self) -> &[Slot] { &self.slots }
    /// The SLOTS cells belonging to one entry.
    pub fn entry_slots(&self, id: u16) -> Option<&[Slot]> {
        let start = id as usize * SLOTS;
        self.slots.get(start..start + SLOTS)
    }
    /// The table in wire format: one micro-op code per cell.
    pub fn to_bytes(&self) -> Vec<u8> { self.slots.iter().map(Slot::code).collect() }

    /// Compare a previously emitted table against this one, reporting the first difference.
    pub fn compare(&self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() != self.slots.len() {
            return Err(check_err!(
                "table has {} cells; expected {}",
                bytes.len(),
                self.slots.len()
            ));
        }
        let found = self
            .slots
            .iter()
            .zip(bytes.iter())
            .position(|(s, &b)| s.code() != b);
        if let Some(i) = found {
            let expected = self.slots[i].op();
            let actual = MicroOp::from_code(bytes[i]).map_or_else(|| format!("${:02X}", bytes[i]), |op| op.to_string());
            return Err(check_err!(
                "opcode ${:02X} step {}: expected {}, found {}",
                i / SLOTS,
                i % SLOTS,
                expected,
                actual
            ));
        }
        Ok(())
    }
}

/// Right-pad a sequence with fetches.
fn pad(seq: &Sequence) -> [Slot; SLOTS] {
    let mut out = [Slot::Fill; SLOTS];
    for (slot, op) in out.iter_mut().zip(seq.ops()) {
        *slot = Slot::Op(*op);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{INTERRUPT_ID, RESET_ID};
    use MicroOp::*;

    fn unpadded(table: &Table, id: u16) -> Vec<MicroOp> {
        table
            .entry_slots(id)
            .unwrap()
            .iter()
            .filter(|s| !s.is_padding())
            .map(Slot::op)
            .collect()
    }
    fn padding(table: &Table, id: u16) -> usize {
        table.entry_slots(id).unwrap().iter().filter(|s| s.is_padding()).count()
    }

    #[test]
    fn dimensions() -> Result<(), Error> {
        let table = Table::builtin()?;
        assert_eq!(table.slots().len(), 4128);
        assert_eq!(table.to_bytes().len(), 4128);
        assert_eq!(table.entries().len(), 258);
        for id in 0..ENTRY_COUNT as u16 {
            let slots = table.entry_slots(id).unwrap();
            assert_eq!(slots.len(), SLOTS);
            // padding only ever follows the sequence
            let used = table.entry(id).unwrap().sequence.len();
            assert!(slots[..used].iter().all(|s| !s.is_padding()));
            assert!(slots[used..].iter().all(|s| s.is_padding()));
        }
        assert!(table.entry_slots(ENTRY_COUNT as u16).is_none());
        Ok(())
    }
    #[test]
    fn only_the_last_cell_is_terminal() -> Result<(), Error> {
        let table = Table::builtin()?;
        let terminal: Vec<usize> = table
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Slot::Terminal)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(terminal, vec![TABLE_SIZE - 1]);
        let rst = table.entry_slots(RESET_ID).unwrap();
        assert_eq!(rst[SLOTS - 1], Slot::Terminal);
        assert_eq!(rst[SLOTS - 2], Slot::Fill);
        assert_eq!(Slot::Terminal.code(), Slot::Fill.code());
        Ok(())
    }
    #[test]
    fn known_entries() -> Result<(), Error> {
        let table = Table::builtin()?;
        assert_eq!(
            unpadded(&table, 0x00),
            vec![RdTmpNoDebug, PushPch, PushPcl, Brk, PushTmp, LdTmpMem, LdHMemP1LTmp, LdPcHl]
        );
        assert_eq!(padding(&table, 0x00), 8);
        assert_eq!(unpadded(&table, 0xEA), vec![LdDummyMemPc]);
        assert_eq!(padding(&table, 0xEA), 15);
        assert_eq!(unpadded(&table, 0x69), vec![RdTmp, Adc]);
        assert_eq!(padding(&table, 0x69), 14);
        assert_eq!(unpadded(&table, 0x6C), vec![RdL, RdH, LdTmpMem, LdHMemP1LTmp, LdPcHl]);
        assert_eq!(padding(&table, 0x6C), 11);
        assert_eq!(
            unpadded(&table, 0x0F),
            vec![RdL, RdH, LdTmpMem, LdMemTmpNoDebug, Asl, Ora, LdMemTmp]
        );
        assert_eq!(unpadded(&table, 0x8D), vec![RdL, RdH, Sta]);
        assert_eq!(unpadded(&table, INTERRUPT_ID).len(), 9);
        assert_eq!(unpadded(&table, RESET_ID).len(), 7);
        let bytes = table.to_bytes();
        assert_eq!(&bytes[0x69 * SLOTS..0x69 * SLOTS + 3], &[1, 34, 0]);
        Ok(())
    }
    #[test]
    fn generation_is_deterministic() -> Result<(), Error> {
        assert_eq!(Table::builtin()?.to_bytes(), Table::builtin()?.to_bytes());
        Ok(())
    }
    #[test]
    fn bad_descriptor_aborts_generation() {
        let mut list = descriptor::builtin();
        list[0x42] = Descriptor::new(0x42, "LDA nn,Q");
        let e = Table::generate(&list).unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidAddressingMode);
        assert_eq!(e.ctx.as_ref().map(|c| c.id), Some(0x42));

        let mut list = descriptor::builtin();
        list[0x10] = Descriptor::new(0x10, "BPL nnnn");
        let e = Table::generate(&list).unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidInstruction);
        assert!(e.to_string().contains("opcode $10 (BPL nnnn)"));
    }
    #[test]
    fn compare_reports_first_difference() -> Result<(), Error> {
        let table = Table::builtin()?;
        let mut bytes = table.to_bytes();
        table.compare(&bytes)?;
        bytes[0x6C * SLOTS + 2] = MicroOp::RdOpcode.code();
        bytes[0x6D * SLOTS] = 0xff;
        let e = table.compare(&bytes).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Check);
        assert!(e.msg.contains("opcode $6C step 2: expected CPU_OP_LD_TMP_MEM, found CPU_OP_RD_OPCODE"));
        let e = table.compare(&bytes[..100]).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Check);
        Ok(())
    }
}
