use std::io;

/// A decoding error, due to a malformed or damaged blob.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The blob isn't one of ours: bad magic, or too short to hold a header.
    #[error("malformed header: {0}")]
    Format(String),

    /// The header was fine, but the code table and payload don't add up to
    /// the declared original length.
    #[error("corrupt stream: {0}")]
    CorruptStream(String),
}

impl From<DecodeError> for io::Error {
    fn from(e: DecodeError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

/// A code that can't be stored in a [`CodeTable`].
///
/// [`CodeTable`]: crate::CodeTable
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("empty code for symbol {symbol:#04x}")]
    Empty { symbol: u8 },

    #[error("code for symbol {symbol:#04x} is {len} bits long (max {})", u8::MAX)]
    TooLong { symbol: u8, len: usize },
}

impl From<CodeError> for DecodeError {
    fn from(e: CodeError) -> Self {
        DecodeError::CorruptStream(e.to_string())
    }
}
