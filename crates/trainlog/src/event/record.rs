//! TFRecord framing for event files.
//!
//! Each record is laid out as:
//! `len: u64 LE | masked_crc(len): u32 LE | data | masked_crc(data): u32 LE`

use std::io::{self, Write};

const MASK_DELTA: u32 = 0xa282_ead8;

/// CRC32C of `data`, masked the way TFRecord expects.
pub fn masked_crc32c(data: &[u8]) -> u32 {
    crc32c::crc32c(data).rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Writes length-delimited, checksummed records.
pub struct RecordWriter<W: Write> {
    inner: W,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_record(&mut self, data: &[u8]) -> io::Result<()> {
        let len = (data.len() as u64).to_le_bytes();
        self.inner.write_all(&len)?;
        self.inner.write_all(&masked_crc32c(&len).to_le_bytes())?;
        self.inner.write_all(data)?;
        self.inner.write_all(&masked_crc32c(data).to_le_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

/// Split a byte buffer back into record payloads, verifying checksums.
pub fn read_records(mut bytes: &[u8]) -> io::Result<Vec<Vec<u8>>> {
    let mut records = Vec::new();

    while !bytes.is_empty() {
        let header = take(&mut bytes, 12)?;
        let (len_bytes, len_crc) = header.split_at(8);
        if masked_crc32c(len_bytes) != u32_le(len_crc) {
            return Err(corrupt("length checksum mismatch"));
        }

        let mut len_buf = [0u8; 8];
        len_buf.copy_from_slice(len_bytes);
        let len = usize::try_from(u64::from_le_bytes(len_buf))
            .map_err(|_| corrupt("record length overflows usize"))?;

        let data = take(&mut bytes, len)?;
        let data_crc = take(&mut bytes, 4)?;
        if masked_crc32c(data) != u32_le(data_crc) {
            return Err(corrupt("data checksum mismatch"));
        }
        records.push(data.to_vec());
    }

    Ok(records)
}

fn take<'a>(bytes: &mut &'a [u8], n: usize) -> io::Result<&'a [u8]> {
    if bytes.len() < n {
        return Err(corrupt("truncated record"));
    }
    let (head, tail) = bytes.split_at(n);
    *bytes = tail;
    Ok(head)
}

fn u32_le(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

fn corrupt(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}
