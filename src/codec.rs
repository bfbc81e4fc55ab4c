//! The encode/decode pipeline: frequencies → tree → codes → packed bits, and
//! back again.

mod decode_map;

use log::trace;

use self::decode_map::{CodeLookup, DecodeMap};
use crate::bits::{pack, unpack, Bits, Code};
use crate::{CodeTable, DecodeError, FrequencyTable};

/// Everything [`decode`] needs to reproduce the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Packed code bits, MSB-first.
    pub payload: Vec<u8>,
    pub codes: CodeTable,
    /// Length of the input, in bytes.
    pub original_len: u64,
    /// Zero bits padding out the last payload byte.
    pub pad: u8,
}

impl Encoded {
    /// Number of meaningful bits in the payload.
    pub fn bit_len(&self) -> usize {
        (self.payload.len() * 8).saturating_sub(self.pad as usize)
    }
}

/// Huffman-code `data` with a code table built from its own statistics.
pub fn encode(data: &[u8]) -> Encoded {
    let freq = FrequencyTable::of(data);
    let codes = CodeTable::from_frequencies(&freq);

    let bit_len: usize = freq
        .iter()
        .filter_map(|(symbol, count)| Some(codes.get(symbol)?.len() * count as usize))
        .sum();
    let mut bits = Bits::with_capacity(bit_len);
    for &byte in data {
        // The table was built from `data`, so every byte in it has a code.
        let Some(code) = codes.get(byte) else {
            unreachable!("byte {byte:#04x} was counted but has no code")
        };
        bits.extend_from_bitslice(code.as_bitslice());
    }
    trace!("encoded {} bytes into {} bits", data.len(), bits.len());

    let (payload, pad) = pack(&bits);
    Encoded {
        payload,
        codes,
        original_len: data.len() as u64,
        pad,
    }
}

/// Reverse [`encode`].
///
/// Decoding stops after `original_len` symbols. Running out of bits first,
/// or having bits left over afterwards, means the payload doesn't belong to
/// this code table.
pub fn decode(
    payload: &[u8],
    codes: &CodeTable,
    original_len: u64,
    pad: u8,
) -> Result<Vec<u8>, DecodeError> {
    let original_len = usize::try_from(original_len).map_err(|_| {
        DecodeError::Format(format!("original length {original_len} doesn't fit in memory"))
    })?;

    let mut entries = codes.iter();
    match (entries.next(), entries.next()) {
        (None, _) if original_len == 0 => return Ok(Vec::new()),
        (None, _) => {
            let msg = format!("empty code table, but {original_len} bytes expected");
            return Err(DecodeError::CorruptStream(msg));
        }
        // Only one symbol: the bits carry no information.
        (Some((symbol, _)), None) => return repeat_symbol(symbol, original_len),
        _ => (),
    }

    let bits = unpack(payload, pad);
    let map = DecodeMap::from_table(codes)?;
    trace!(
        "decoding {} bits against {} codes (longest {})",
        bits.len(),
        codes.len(),
        map.max_len()
    );

    let mut out = Vec::with_capacity(original_len.min(bits.len()));
    let mut candidate = Code::with_capacity(map.max_len());
    let mut consumed = 0;

    while out.len() < original_len {
        let Some(bit) = bits.get(consumed).map(|bit| *bit) else {
            let msg = format!(
                "ran out of bits after {} of {original_len} bytes",
                out.len()
            );
            return Err(DecodeError::CorruptStream(msg));
        };
        consumed += 1;
        candidate.push(bit);

        if let Some(symbol) = map.lookup(&candidate) {
            out.push(symbol);
            candidate.clear();
        } else if candidate.len() >= map.max_len() {
            let msg = format!("no code matches the bits ending at offset {consumed}");
            return Err(DecodeError::CorruptStream(msg));
        }
    }

    if consumed < bits.len() {
        let msg = format!(
            "{} unmatched bits after the last of {original_len} bytes",
            bits.len() - consumed
        );
        return Err(DecodeError::CorruptStream(msg));
    }

    Ok(out)
}

/// `len` copies of `symbol`.
///
/// `len` comes from an untrusted header, so the allocation is allowed to fail.
fn repeat_symbol(symbol: u8, len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|e| {
        DecodeError::CorruptStream(format!("can't hold the declared {len} bytes: {e}"))
    })?;
    out.resize(len, symbol);
    Ok(out)
}
