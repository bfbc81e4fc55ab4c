//! Byte-oriented Huffman compression.
//!
//! [`compress`] builds a Huffman code from the input's own byte frequencies
//! and wraps the code table and packed bits in a self-describing blob;
//! [`decompress`] needs nothing but that blob to get the input back.
//!
//! ```
//! let blob = bytehuff::compress(b"abracadabra");
//! assert_eq!(bytehuff::decompress(&blob)?, b"abracadabra");
//! # Ok::<(), bytehuff::DecodeError>(())
//! ```

pub mod bits;
pub mod codec;
pub mod container;

mod code_table;
mod errors;
mod tree;

pub use crate::code_table::{CodeTable, MAX_CODE_LEN};
pub use crate::container::{compress, decompress, read_header, Header};
pub use crate::errors::{CodeError, DecodeError};
pub use crate::tree::FrequencyTable;
