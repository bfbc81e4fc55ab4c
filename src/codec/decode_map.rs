use std::collections::HashMap;

use crate::bits::Code;
use crate::{CodeTable, DecodeError};

pub(crate) trait CodeLookup {
    fn add_code(&mut self, code: Code, symbol: u8) -> Result<(), DecodeError>;
    fn lookup(&self, code: &Code) -> Option<u8>;
}

/// Reverse of a [`CodeTable`]: code → symbol.
pub(crate) struct DecodeMap {
    map: HashMap<Code, u8>,
    max_len: usize,
}

impl DecodeMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            max_len: 0,
        }
    }

    /// Invert `codes`. Fails if two symbols share a code.
    pub fn from_table(codes: &CodeTable) -> Result<Self, DecodeError> {
        let mut map = Self::new();
        for (symbol, code) in codes.iter() {
            map.add_code(code.clone(), symbol)?;
        }
        Ok(map)
    }

    /// Length of the longest code; no candidate longer than this can match.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl CodeLookup for DecodeMap {
    fn add_code(&mut self, code: Code, symbol: u8) -> Result<(), DecodeError> {
        self.max_len = self.max_len.max(code.len());
        if let Some(other) = self.map.insert(code, symbol) {
            let msg = format!("symbols {other:#04x} and {symbol:#04x} share a code");
            return Err(DecodeError::CorruptStream(msg));
        }
        Ok(())
    }

    fn lookup(&self, code: &Code) -> Option<u8> {
        self.map.get(code).copied()
    }
}

#[cfg(test)]
mod tests {
    use bitvec::prelude::*;

    use super::*;

    #[test]
    fn inverts_table() -> anyhow::Result<()> {
        let mut codes = CodeTable::new();
        codes.insert(b'x', bitvec![u8, Msb0; 0])?;
        codes.insert(b'y', bitvec![u8, Msb0; 1, 0])?;
        codes.insert(b'z', bitvec![u8, Msb0; 1, 1, 0])?;

        let map = DecodeMap::from_table(&codes)?;
        assert_eq!(map.lookup(&bitvec![u8, Msb0; 1, 0]), Some(b'y'));
        assert_eq!(map.lookup(&bitvec![u8, Msb0; 1]), None);
        assert_eq!(map.max_len(), 3);
        Ok(())
    }

    #[test]
    fn rejects_shared_codes() -> anyhow::Result<()> {
        let mut codes = CodeTable::new();
        codes.insert(1, bitvec![u8, Msb0; 0, 1])?;
        codes.insert(2, bitvec![u8, Msb0; 0, 1])?;

        let result = DecodeMap::from_table(&codes);
        assert!(matches!(result, Err(DecodeError::CorruptStream(_))));
        Ok(())
    }
}
