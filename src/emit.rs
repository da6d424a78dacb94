//! Serializes a generated table.
//!
//! The source formats lay the table out one cell per line with a comment naming each
//! entry. Every cell is followed by a comma except the table's terminal cell.
use super::hex::HexRecordCollection;
use super::micro_op::MicroOp;
use super::table::{Slot, Table, SLOTS, TABLE_SIZE};
use super::descriptor::{INTERRUPT_ID, RESET_ID};
use super::*;

use std::io::Write;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// C/C++ array definition using the engine's CPU_OP_* constants
    C,
    /// Rust source with the CPU_OP_* constants and a static array
    Rust,
    /// raw micro-op codes
    Bin,
    /// Intel HEX
    Hex,
    /// human readable listing
    List,
}
impl Format {
    fn default_symbol(&self) -> &'static str {
        match self {
            Format::Rust => "OPCODE_TABLE",
            _ => "opcodeTable",
        }
    }
}

/// Render the table in the given format. `symbol` overrides the array name.
pub fn emit(table: &Table, format: Format, symbol: Option<&str>, w: &mut dyn Write) -> Result<(), Error> {
    let symbol = symbol.unwrap_or_else(|| format.default_symbol());
    match format {
        Format::C => write_c(table, symbol, w),
        Format::Rust => write_rust(table, symbol, w),
        Format::Bin => {
            w.write_all(&table.to_bytes())?;
            Ok(())
        }
        Format::Hex => {
            let hf = HexRecordCollection::from_bytes(&table.to_bytes())?;
            verbose_println!("{} hex records", hf.len());
            hf.write_to_file(w)
        }
        Format::List => write_list(table, w),
    }
}

/// Write the cells one per line, each entry introduced by a comment.
fn write_cells(table: &Table, w: &mut dyn Write) -> Result<(), Error> {
    for (i, slot) in table.slots().iter().enumerate() {
        if i % SLOTS == 0 {
            if let Some(entry) = table.entry((i / SLOTS) as u16) {
                writeln!(w, "    // 0x{:02X}: {}", entry.descriptor.id, entry.descriptor.text)?;
            }
        }
        match slot {
            Slot::Terminal => writeln!(w, "    {}", slot.op().name())?,
            _ => writeln!(w, "    {},", slot.op().name())?,
        }
    }
    Ok(())
}

fn write_c(table: &Table, symbol: &str, w: &mut dyn Write) -> Result<(), Error> {
    writeln!(w, "// generated by optable; do not edit")?;
    writeln!(w, "// CPU_OP_* values are defined by the execution engine")?;
    writeln!(w)?;
    writeln!(w, "const unsigned char {}[{}] = {{", symbol, TABLE_SIZE)?;
    write_cells(table, w)?;
    writeln!(w, "}};")?;
    Ok(())
}

fn write_rust(table: &Table, symbol: &str, w: &mut dyn Write) -> Result<(), Error> {
    writeln!(w, "// generated by optable; do not edit")?;
    writeln!(w)?;
    for op in MicroOp::ALL {
        writeln!(w, "pub const {}: u8 = {};", op.name(), op.code())?;
    }
    writeln!(w)?;
    writeln!(w, "#[rustfmt::skip]")?;
    writeln!(w, "pub static {}: [u8; {}] = [", symbol, TABLE_SIZE)?;
    write_cells(table, w)?;
    writeln!(w, "];")?;
    Ok(())
}

fn write_list(table: &Table, w: &mut dyn Write) -> Result<(), Error> {
    for entry in table.entries() {
        let names: Vec<&str> = entry
            .sequence
            .ops()
            .iter()
            .map(|op| op.name().trim_start_matches("CPU_OP_"))
            .collect();
        writeln!(
            w,
            "${:03X}  {:12} {:2}  {}",
            entry.descriptor.id,
            entry.descriptor.text,
            entry.sequence.len(),
            names.join(" ")
        )?;
    }
    Ok(())
}

/// Print one entry's cells, padding included.
pub fn write_entry(table: &Table, id: u16, w: &mut dyn Write) -> Result<(), Error> {
    let entry = table
        .entry(id)
        .ok_or_else(|| general_err!(format!("no table entry ${:02X}", id)))?;
    let slots = table.entry_slots(id).unwrap_or_default();
    writeln!(w, "0x{:02X}: {} ({:?})", id, entry.descriptor.text, entry.instruction.mode)?;
    match id {
        INTERRUPT_ID => writeln!(w, "  entered instead of an opcode fetch when an interrupt is pending")?,
        RESET_ID => writeln!(w, "  entered when the reset line is released")?,
        _ => {}
    }
    for (step, slot) in slots.iter().enumerate() {
        let note = match slot {
            Slot::Terminal => " (end of table)",
            s if s.is_padding() => " (fill)",
            _ => "",
        };
        writeln!(w, "  {:2}  {:3}  {}{}", step, slot.code(), slot.op(), note)?;
    }
    Ok(())
}
