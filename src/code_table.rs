use std::collections::BTreeMap;
use std::io::{self, prelude::*, Cursor};

use log::trace;

use crate::bits::{byte_len, pack, unpack, Code};
use crate::{CodeError, DecodeError};

/// Longest code the serialized form can describe.
pub const MAX_CODE_LEN: usize = u8::MAX as usize;

/// Mapping from byte value to its (non-empty) bit code.
///
/// Iterates in ascending symbol order, so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the code for `symbol`, returning the previous code.
    ///
    /// Codes must be 1 to [`MAX_CODE_LEN`] bits long.
    pub fn insert(&mut self, symbol: u8, code: Code) -> Result<Option<Code>, CodeError> {
        if code.is_empty() {
            return Err(CodeError::Empty { symbol });
        }
        if code.len() > MAX_CODE_LEN {
            return Err(CodeError::TooLong {
                symbol,
                len: code.len(),
            });
        }

        Ok(self.codes.insert(symbol, code))
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Whether no code in the table is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // After sorting, a prefix always sorts immediately before some code
        // it prefixes, so comparing neighbours is enough.
        let mut codes: Vec<&Code> = self.codes.values().collect();
        codes.sort();
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0].as_bitslice()))
    }

    /// Serialize the table.
    ///
    /// Layout: a big-endian u16 entry count, then per entry one symbol byte,
    /// one code-length byte, and the code bits packed MSB-first into
    /// `ceil(len / 8)` bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len());
        out.extend_from_slice(&(self.codes.len() as u16).to_be_bytes());

        for (symbol, code) in self.iter() {
            out.push(symbol);
            // `insert` keeps every length within a byte.
            out.push(code.len() as u8);

            out.extend(pack(code).0);
        }

        out
    }

    /// Read a table starting at `offset` in `blob`.
    ///
    /// Returns the table and the offset just past it, where the payload
    /// begins.
    pub fn deserialize(blob: &[u8], offset: usize) -> Result<(CodeTable, usize), DecodeError> {
        let mut input = Cursor::new(blob);
        input.set_position(offset as u64);

        let count = read_u16_be(&mut input).map_err(truncated)?;
        let mut table = CodeTable::new();

        for _ in 0..count {
            let mut entry = [0; 2];
            input.read_exact(&mut entry).map_err(truncated)?;
            let [symbol, len] = entry;

            let mut packed = vec![0; byte_len(len as usize)];
            input.read_exact(&mut packed).map_err(truncated)?;
            let mut code = unpack(&packed, 0);
            code.truncate(len as usize);

            if table.insert(symbol, code)?.is_some() {
                let msg = format!("symbol {symbol:#04x} appears twice in the code table");
                return Err(DecodeError::CorruptStream(msg));
            }
        }

        trace!("read code table with {} entries", table.len());
        Ok((table, input.position() as usize))
    }

    fn serialized_len(&self) -> usize {
        let entries: usize = self.codes.values().map(|c| 2 + byte_len(c.len())).sum();
        2 + entries
    }
}

fn read_u16_be(mut input: impl Read) -> io::Result<u16> {
    let mut buf = [0; 2];
    input.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn truncated(_: io::Error) -> DecodeError {
    DecodeError::CorruptStream("code table is truncated".into())
}

#[cfg(test)]
mod tests {
    use bitvec::prelude::*;
    use test_case::test_case;

    use super::*;

    fn table(entries: &[(u8, &str)]) -> CodeTable {
        let mut table = CodeTable::new();
        for &(symbol, bits) in entries {
            let code: Code = bits.chars().map(|c| c == '1').collect();
            table.insert(symbol, code).unwrap();
        }
        table
    }

    #[test]
    fn layout() {
        let table = table(&[(b'a', "0"), (b'b', "101100001")]);
        let expected = [
            0x00, 0x02, // entry count
            b'a', 1, 0b_0000_0000, //
            b'b', 9, 0b_1011_0000, 0b_1000_0000,
        ];
        assert_eq!(table.serialize(), expected);
    }

    #[test_case(table(&[(0, "0")]) ; "one entry")]
    #[test_case(table(&[(b'x', "0"), (b'y', "1")]) ; "two entries")]
    #[test_case(table(&[(7, "1"), (200, "0".repeat(255).as_str())]) ; "max length code")]
    fn round_trip(table: CodeTable) -> anyhow::Result<()> {
        let bytes = table.serialize();
        let (decoded, end) = CodeTable::deserialize(&bytes, 0)?;
        assert_eq!(decoded, table);
        assert_eq!(end, bytes.len());
        Ok(())
    }

    #[test]
    fn round_trip_full_alphabet() -> anyhow::Result<()> {
        // Every symbol gets a distinct 8-bit code, plus one stretched to 255 bits.
        let mut table = CodeTable::new();
        for symbol in 0..=u8::MAX {
            table.insert(symbol, symbol.view_bits::<Msb0>().to_bitvec())?;
        }
        let mut long = Code::repeat(true, MAX_CODE_LEN);
        long.set(0, false);
        table.insert(0, long)?;

        let bytes = table.serialize();
        let (decoded, _) = CodeTable::deserialize(&bytes, 0)?;
        assert_eq!(decoded.len(), 256);
        assert_eq!(decoded, table);
        Ok(())
    }

    #[test]
    fn deserialize_at_offset() -> anyhow::Result<()> {
        let table = table(&[(b'q', "10"), (b'r', "0"), (b's', "11")]);
        let mut blob = vec![0xAA; 5];
        blob.extend(table.serialize());
        blob.extend([0xFF, 0xEE]);

        let (decoded, end) = CodeTable::deserialize(&blob, 5)?;
        assert_eq!(decoded, table);
        assert_eq!(&blob[end..], &[0xFF, 0xEE]);
        Ok(())
    }

    #[test]
    fn rejects_bad_codes() {
        let mut table = CodeTable::new();
        assert_eq!(
            table.insert(1, Code::new()),
            Err(CodeError::Empty { symbol: 1 })
        );
        assert_eq!(
            table.insert(2, Code::repeat(false, 256)),
            Err(CodeError::TooLong { symbol: 2, len: 256 })
        );
        assert!(table.is_empty());
    }

    #[test]
    fn deserialize_truncated() {
        let bytes = table(&[(b'a', "0"), (b'b', "11")]).serialize();
        for cut in 0..bytes.len() {
            let result = CodeTable::deserialize(&bytes[..cut], 0);
            assert!(matches!(result, Err(DecodeError::CorruptStream(_))), "cut at {cut}");
        }
    }

    #[test]
    fn deserialize_zero_length_code() {
        let bytes = [0x00, 0x01, b'a', 0];
        let result = CodeTable::deserialize(&bytes, 0);
        assert!(matches!(result, Err(DecodeError::CorruptStream(_))));
    }

    #[test]
    fn deserialize_duplicate_symbol() {
        let bytes = [0x00, 0x02, b'a', 1, 0x00, b'a', 1, 0x80];
        let result = CodeTable::deserialize(&bytes, 0);
        assert!(matches!(result, Err(DecodeError::CorruptStream(_))));
    }

    #[test_case(&[(1, "0"), (2, "10"), (3, "11")], true)]
    #[test_case(&[(1, "0"), (2, "01")], false)]
    #[test_case(&[(1, "10"), (2, "0"), (3, "101")], false)]
    #[test_case(&[(1, "0")], true)]
    fn prefix_free(entries: &[(u8, &str)], expected: bool) {
        assert_eq!(table(entries).is_prefix_free(), expected);
    }
}
