use crate::emit::Format;
use clap::Parser;
use clap_num::maybe_hex;
use lazy_static::lazy_static;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author,version,about,long_about=None)]
pub struct Args {
    /// Write the table to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::C)]
    pub format: Format,

    /// Name of the emitted array (c and rust formats)
    #[arg(long)]
    pub symbol: Option<String>,

    /// Read the instruction descriptors from a file instead of using the built-in list
    #[arg(short, long)]
    pub descriptors: Option<PathBuf>,

    /// Print the sequence for a single table entry (hex ok with '0x')
    #[arg(short, long, value_parser=maybe_hex::<u16>)]
    pub show: Option<u16>,

    /// Compare a previously emitted .bin or .hex table with the generated one
    #[arg(short, long)]
    pub check: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

lazy_static! {
    pub static ref ARGS: Args = if cfg!(test) {
        // manually set parameters for running tests
        Args::parse_from(["test"])
    } else {
        Args::parse()
    };
}

pub fn init() { lazy_static::initialize(&ARGS); }
