//! Packing logical bit sequences into bytes, MSB-first, and back.

use bitvec::prelude::*;

/// A single codeword.
///
/// Same type as [`Bits`]; the two names only say which role a value plays.
pub type Code = BitVec<u8, Msb0>;

/// A stream of bits, as produced by the encoder. Same type as [`Code`].
pub type Bits = BitVec<u8, Msb0>;

/// Pack `bits` into bytes, most-significant bit first.
///
/// The final byte is padded with zero bits; the number of padding bits (0-7)
/// is returned alongside the bytes.
pub fn pack(bits: &BitSlice<u8, Msb0>) -> (Vec<u8>, u8) {
    // Copy into a fresh, head-aligned buffer so the storage *is* the packing.
    let mut buf = Bits::with_capacity(bits.len());
    buf.extend_from_bitslice(bits);
    buf.set_uninitialized(false);

    (buf.into_vec(), pad_count(bits.len()))
}

/// Expand `bytes` into bits, MSB-first, dropping the trailing `pad` bits.
///
/// Never fails. Empty input, or more padding than there are bits, yields an
/// empty sequence.
pub fn unpack(bytes: &[u8], pad: u8) -> Bits {
    let mut bits = Bits::from_slice(bytes);
    let keep = bits.len().saturating_sub(pad as usize);
    bits.truncate(keep);
    bits
}

/// Zero bits needed to round `bit_len` up to a whole number of bytes.
pub fn pad_count(bit_len: usize) -> u8 {
    ((8 - bit_len % 8) % 8) as u8
}

/// Bytes needed to hold `bit_len` bits.
pub fn byte_len(bit_len: usize) -> usize {
    (bit_len + 7) / 8
}
