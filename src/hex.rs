//! Intel HEX (I8HEX) reading and writing, for moving the table around as text.
//!
//! The table is written as data records starting at address 0 followed by an EOF
//! record. See [this wikipedia article](https://en.wikipedia.org/wiki/Intel_HEX) for
//! the format.

use super::*;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

lazy_static! {
    // everything after the colon: count, address, type, data and checksum
    static ref RE_RECORD: Regex = Regex::new(r"(?i)^\s*:((?:[0-9a-f]{2})+)\s*$").unwrap();
}

const DATA: u8 = 0;
const END_OF_FILE: u8 = 1;
/// Maximum number of data bytes written per record.
pub const MAX_DATA: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRecord {
    pub address: u16,
    pub record_type: u8,
    pub data: Vec<u8>,
}
impl HexRecord {
    pub fn data(address: u16, data: &[u8]) -> Self {
        HexRecord {
            address,
            record_type: DATA,
            data: data.to_vec(),
        }
    }
    pub fn end_of_file() -> Self {
        HexRecord {
            address: 0,
            record_type: END_OF_FILE,
            data: Vec::new(),
        }
    }
    /// The record as it appears on the wire, checksum included.
    fn to_bytes(&self) -> Vec<u8> {
        let [hi, lo] = self.address.to_be_bytes();
        let mut bytes = vec![self.data.len() as u8, hi, lo, self.record_type];
        bytes.extend_from_slice(&self.data);
        bytes.push(checksum(&bytes).wrapping_neg());
        bytes
    }
    /// Parse one line. Lines without a record are Ok(None); a malformed record is an error.
    pub fn from_str(line: &str) -> Result<Option<Self>, Error> {
        let digits = match RE_RECORD.captures(line).and_then(|c| c.get(1)) {
            Some(m) => m.as_str(),
            None => return Ok(None),
        };
        let bad_record = |why: &str| general_err!(format!("bad hex record ({}): \"{}\"", why, line.trim()));
        let bytes = (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..i + 2], 16))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| bad_record("not hex"))?;
        if bytes.len() < 5 || bytes.len() != bytes[0] as usize + 5 {
            return Err(bad_record("length"));
        }
        if checksum(&bytes) != 0 {
            return Err(bad_record("checksum"));
        }
        Ok(Some(HexRecord {
            address: u16::from_be_bytes([bytes[1], bytes[2]]),
            record_type: bytes[3],
            data: bytes[4..bytes.len() - 1].to_vec(),
        }))
    }
}
impl fmt::Display for HexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":")?;
        for b in self.to_bytes() {
            write!(f, "{:02X}", b)?;
        }
        writeln!(f)
    }
}

fn checksum(bytes: &[u8]) -> u8 { bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b)) }

pub struct HexRecordCollection {
    records: Vec<HexRecord>,
    eof: bool,
}

impl HexRecordCollection {
    pub fn new() -> Self {
        HexRecordCollection {
            records: Vec::new(),
            eof: false,
        }
    }
    /// Split a contiguous image starting at address 0 into data records and terminate it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() > 0x10000 {
            return Err(general_err!("image is too large for I8HEX"));
        }
        let mut hf = HexRecordCollection::new();
        for (i, chunk) in bytes.chunks(MAX_DATA).enumerate() {
            hf.add_record(HexRecord::data((i * MAX_DATA) as u16, chunk))?;
        }
        hf.add_eof();
        Ok(hf)
    }
    pub fn from_str_iter<I, T>(iter: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut hf = HexRecordCollection::new();
        for line in iter {
            if let Some(hr) = HexRecord::from_str(line.as_ref())? {
                hf.add_record(hr)?
            }
        }
        if hf.eof {
            Ok(hf)
        } else {
            Err(general_err!("EOF record not found in hex file"))
        }
    }
    pub fn add_record(&mut self, h: HexRecord) -> Result<(), Error> {
        if self.eof {
            return Err(general_err!("records after EOF in hex file"));
        }
        self.eof = h.record_type == END_OF_FILE;
        self.records.push(h);
        Ok(())
    }
    pub fn add_eof(&mut self) {
        if !self.eof {
            self.records.push(HexRecord::end_of_file());
            self.eof = true;
        }
    }
    /// Flatten the data records into one image starting at address 0.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut image = Vec::new();
        for r in self.records.iter() {
            match r.record_type {
                DATA => {
                    let start = r.address as usize;
                    let end = start + r.data.len();
                    if image.len() < end {
                        image.resize(end, 0);
                    }
                    image[start..end].copy_from_slice(&r.data);
                }
                END_OF_FILE => break,
                _ => warn!("ignoring unsupported record type ({}) in hex file.", r.record_type),
            }
        }
        image
    }
    pub fn read_from_file(path: &Path) -> Result<Self, Error> {
        let lines = BufReader::new(File::open(path)?)
            .lines()
            .collect::<Result<Vec<String>, io::Error>>()?;
        HexRecordCollection::from_str_iter(lines)
    }
    pub fn write_to_file(&self, f: &mut dyn io::Write) -> Result<(), Error> {
        if !self.eof {
            return Err(general_err!("cannot write hex file without EOF record"));
        }
        for r in self.records.iter() {
            f.write_all(r.to_string().as_bytes())?;
        }
        Ok(())
    }
    pub fn len(&self) -> usize { self.records.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_format() -> Result<(), Error> {
        let r = HexRecord::data(0x0030, &[0x02, 0x33, 0x7a]);
        assert_eq!(r.to_string(), ":0300300002337A1E\n");
        let mut hf = HexRecordCollection::new();
        hf.add_eof();
        let mut out = Vec::new();
        hf.write_to_file(&mut out)?;
        assert_eq!(out, b":00000001FF\n");
        Ok(())
    }
    #[test]
    fn parse_and_flatten() -> Result<(), Error> {
        let lines = [":0300300002337a1e", "garbage", ":00000001FF"];
        let hf = HexRecordCollection::from_str_iter(lines)?;
        let image = hf.to_bytes();
        assert_eq!(image.len(), 0x33);
        assert_eq!(&image[0x30..], &[0x02, 0x33, 0x7a]);
        Ok(())
    }
    #[test]
    fn malformed_records_are_errors() {
        // bad checksum, short data, missing EOF, records after EOF
        assert!(HexRecordCollection::from_str_iter([":0300300002337A1F", ":00000001FF"]).is_err());
        assert!(HexRecordCollection::from_str_iter([":0300300002331E", ":00000001FF"]).is_err());
        assert!(HexRecordCollection::from_str_iter([":0300300002337A1E"]).is_err());
        assert!(HexRecordCollection::from_str_iter([":00000001FF", ":0300300002337A1E"]).is_err());
    }
    #[test]
    fn split_into_records() -> Result<(), Error> {
        let bytes: Vec<u8> = (0..100u8).collect();
        let hf = HexRecordCollection::from_bytes(&bytes)?;
        // 32 + 32 + 32 + 4, plus EOF
        assert_eq!(hf.len(), 5);
        let mut out = Vec::new();
        hf.write_to_file(&mut out)?;
        let text = String::from_utf8(out).map_err(|e| general_err!(e))?;
        let back = HexRecordCollection::from_str_iter(text.lines())?;
        assert_eq!(back.to_bytes(), bytes);
        Ok(())
    }
}
