//! Verifies that a previously emitted table still matches what the generator produces.
use super::hex::HexRecordCollection;
use super::table::Table;
use super::*;

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Load the micro-op codes from a `.hex` file or a raw binary table.
pub fn read_table(path: &Path) -> Result<Vec<u8>, Error> {
    let ext = path.extension().and_then(OsStr::to_str).unwrap_or("");
    if ext.eq_ignore_ascii_case("hex") {
        Ok(HexRecordCollection::read_from_file(path)?.to_bytes())
    } else {
        Ok(fs::read(path)?)
    }
}

pub fn check_file(table: &Table, path: &Path) -> Result<(), Error> {
    let bytes = read_table(path)?;
    verbose_println!("read {} bytes from {}", bytes.len(), path.display());
    table.compare(&bytes)
}
