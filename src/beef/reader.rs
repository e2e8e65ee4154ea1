//! Cursor over envelope bytes using consensus decoding for each item

use crate::errors::{BeefError, BeefResult};
use bitcoin::consensus::encode::{deserialize_partial, Decodable, VarInt};

pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Decode one consensus-encoded item, naming it in any error
    pub(crate) fn read<T: Decodable>(&mut self, what: &str) -> BeefResult<T> {
        if self.pos >= self.data.len() {
            return Err(BeefError::Truncated(format!("expected {}", what)));
        }
        let (value, consumed) = deserialize_partial::<T>(&self.data[self.pos..])
            .map_err(|e| BeefError::Malformed(format!("{}: {}", what, e)))?;
        self.pos += consumed;
        Ok(value)
    }

    pub(crate) fn read_varint(&mut self, what: &str) -> BeefResult<u64> {
        Ok(self.read::<VarInt>(what)?.0)
    }

    /// Read a count and convert it to `usize`, bounded by the bytes left
    pub(crate) fn read_count(&mut self, what: &str) -> BeefResult<usize> {
        let count = self.read_varint(what)?;
        if count > self.remaining() as u64 {
            return Err(BeefError::Truncated(format!(
                "{} of {} exceeds remaining {} bytes",
                what,
                count,
                self.remaining()
            )));
        }
        Ok(count as usize)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
