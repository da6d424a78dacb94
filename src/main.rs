//! # A micro-op table generator for a cycle-stepped 6502 (MOS 7501/8501) interpreter.
//!
//! For every opcode byte, plus the interrupt and reset pseudo-opcodes, the generator
//! works out the sequence of one-cycle micro-ops the real chip performs and writes them
//! out as a flat table of 258 x 16 micro-op codes for the execution engine.
//!
//! ## Getting Started
//! To write the table as C source:
//! ```
//! cargo run -- -o cpuoptbl.cpp
//! ```
//! ...or to see what a single opcode does:
//! ```
//! optable --show 0x6c
//! ```
//! ## Options
//! Help for command line options is available using -h or --help.
#[macro_use]
mod macros;
mod term;
mod check;
mod classify;
mod config;
mod descriptor;
mod emit;
mod error;
mod hex;
mod micro_op;
mod mnemonic;
mod sequence;
mod table;
use crate::emit::Format;
use crate::table::Table;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::result::Result;
use std::{fmt, io};
pub(crate) use crate::error::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::init();
    term::init();
    // generate does all the work
    if let Err(e) = generate() {
        eprintln!("{}", e);
        return Err(Box::new(e));
    }
    Ok(())
}
/// generate drives the top level functionality (load descriptors, build, emit or check)
fn generate() -> Result<(), Error> {
    let table = match config::ARGS.descriptors.as_ref() {
        Some(path) => {
            info!("Loading descriptors from {}", path.display());
            Table::generate(&descriptor::read_from_file(path)?)?
        }
        None => Table::builtin()?,
    };
    verbose_println!("generated {} entries ({} cells)", table.entries().len(), table.slots().len());
    if let Some(id) = config::ARGS.show {
        let stdout = io::stdout();
        return emit::write_entry(&table, id, &mut stdout.lock());
    }
    if let Some(path) = config::ARGS.check.as_ref() {
        check::check_file(&table, path)?;
        info!("{} matches the generated table", path.display());
        return Ok(());
    }
    write_output(
        &table,
        config::ARGS.format,
        config::ARGS.symbol.as_deref(),
        config::ARGS.output.as_deref(),
    )
}
/// Render the whole table before touching the destination so a failure leaves nothing behind.
fn write_output(table: &Table, format: Format, symbol: Option<&str>, path: Option<&Path>) -> Result<(), Error> {
    if symbol.is_some() && !matches!(format, Format::C | Format::Rust) {
        warn!("--symbol has no effect on {:?} output", format);
    }
    let mut buf = Vec::new();
    emit::emit(table, format, symbol, &mut buf)?;
    match path {
        Some(path) => {
            File::create(path)?.write_all(&buf)?;
            info!("wrote {:?} table: {}", format, path.display());
        }
        None => {
            if format == Format::Bin && term::stdout_is_tty() {
                return Err(general_err!("refusing to write a binary table to a terminal; use --output"));
            }
            io::stdout().lock().write_all(&buf)?;
        }
    }
    Ok(())
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_arguments() {
        assert_eq!(config::ARGS.format, Format::C);
        assert!(config::ARGS.output.is_none());
        assert!(config::ARGS.show.is_none());
    }
    #[test]
    fn parse_arguments() {
        use clap::Parser;
        let args = config::Args::parse_from(["optable", "-f", "hex", "--show", "0x6c", "-o", "t.hex"]);
        assert_eq!(args.format, Format::Hex);
        assert_eq!(args.show, Some(0x6c));
        assert_eq!(args.output.as_deref(), Some(Path::new("t.hex")));
        let args = config::Args::parse_from(["optable", "-s", "257"]);
        assert_eq!(args.show, Some(0x101));
        assert!(config::Args::try_parse_from(["optable", "-f", "cobol"]).is_err());
    }
    #[test]
    fn write_and_check_round_trip() -> Result<(), Error> {
        let table = Table::builtin()?;
        let path = std::env::temp_dir().join(format!("optable-main-{}.hex", std::process::id()));
        write_output(&table, Format::Hex, None, Some(&path))?;
        let result = check::check_file(&table, &path);
        fs::remove_file(&path)?;
        result
    }
    #[test]
    fn descriptor_file_drives_generation() -> Result<(), Error> {
        // write the built-in list out, break one entry, and make sure nothing is generated
        let path = std::env::temp_dir().join(format!("optable-main-{}.txt", std::process::id()));
        let mut text = String::from("; opcode descriptors\n");
        for d in descriptor::builtin() {
            let d = if d.id == 0x90 {
                descriptor::Descriptor::new(d.id, "BCC nnnn")
            } else {
                d
            };
            text.push_str(&format!("0x{:02X} {}\n", d.id, d.text));
        }
        fs::write(&path, text)?;
        let list = descriptor::read_from_file(&path);
        fs::remove_file(&path)?;
        let e = Table::generate(&list?).unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidInstruction);
        assert_eq!(e.ctx.map(|c| c.id), Some(0x90));
        Ok(())
    }
}
