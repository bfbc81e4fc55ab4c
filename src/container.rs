//! The self-describing blob format.
//!
//! ```text
//! offset  size  field
//!      0     4  magic, "HUF1"
//!      4     8  original length (u64, big-endian)
//!     12     1  padding bits in the last payload byte (0-7)
//!     13     2  code table entry count (u16, big-endian)
//!     15     *  code table entries
//!      *     *  payload
//! ```

use std::io::{self, prelude::*, Cursor};

use log::debug;

use crate::codec::{decode, encode};
use crate::{CodeTable, DecodeError};

pub const MAGIC: [u8; 4] = *b"HUF1";

/// Size of the fixed part of the header, up to and including the code table
/// entry count.
pub const HEADER_LEN: usize = 15;

/// Where the serialized code table, entry count included, begins.
const TABLE_START: usize = 13;

/// The fixed header fields of a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub original_len: u64,
    pub pad: u8,
    pub table_entries: u16,
}

/// Compress `data` into a self-describing blob.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let enc = encode(data);
    let table = enc.codes.serialize();

    let mut blob = Vec::with_capacity(TABLE_START + table.len() + enc.payload.len());
    blob.extend_from_slice(&MAGIC);
    blob.extend_from_slice(&enc.original_len.to_be_bytes());
    blob.push(enc.pad);
    // The serialized table starts with its own entry count.
    blob.extend_from_slice(&table);
    blob.extend_from_slice(&enc.payload);

    debug!(
        "compressed {} bytes into {} ({} symbols, {} payload bytes)",
        data.len(),
        blob.len(),
        enc.codes.len(),
        enc.payload.len()
    );
    blob
}

/// Reverse [`compress`].
///
/// An empty blob decompresses to nothing.
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if blob.is_empty() {
        return Ok(Vec::new());
    }

    let header = read_header(blob)?;
    let (codes, payload_start) = CodeTable::deserialize(blob, TABLE_START)?;
    let data = decode(&blob[payload_start..], &codes, header.original_len, header.pad)?;

    debug!("decompressed {} bytes into {}", blob.len(), data.len());
    Ok(data)
}

/// Validate and return the fixed header of `blob`, without decoding it.
pub fn read_header(blob: &[u8]) -> Result<Header, DecodeError> {
    let mut input = Cursor::new(blob);

    let mut magic = [0; 4];
    input.read_exact(&mut magic).map_err(too_short)?;
    if magic != MAGIC {
        let msg = format!("unrecognized magic. expected {MAGIC:?}, got {magic:?}");
        return Err(DecodeError::Format(msg));
    }

    let original_len = read_u64_be(&mut input).map_err(too_short)?;
    let pad = read_u8(&mut input).map_err(too_short)?;
    let table_entries = read_u16_be(&mut input).map_err(too_short)?;

    if pad > 7 {
        let msg = format!("padding of {pad} bits; expected at most 7");
        return Err(DecodeError::Format(msg));
    }

    Ok(Header {
        original_len,
        pad,
        table_entries,
    })
}

fn read_u8(mut input: impl Read) -> io::Result<u8> {
    let mut buf = [0; 1];
    input.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16_be(mut input: impl Read) -> io::Result<u16> {
    let mut buf = [0; 2];
    input.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_u64_be(mut input: impl Read) -> io::Result<u64> {
    let mut buf = [0; 8];
    input.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

fn too_short(_: io::Error) -> DecodeError {
    DecodeError::Format(format!("blob is shorter than the {HEADER_LEN}-byte header"))
}
