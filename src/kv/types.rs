//! Data types for the KV store module.

use crate::codec::{self, CodecError};

/// One persisted row of the key-value table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Surrogate row id assigned by storage.
    pub id: i64,

    /// Unique key.
    pub key: String,

    /// Encoded value bytes. The encoding is not recorded alongside them.
    pub value: Vec<u8>,
}

impl Entry {
    /// Decode the value as UTF-8 text.
    pub fn decode_text(&self) -> Result<String, CodecError> {
        codec::decode_text(&self.value)
    }

    /// Decode the value as a little-endian integer.
    pub fn decode_integer(&self) -> Result<i64, CodecError> {
        codec::decode_integer(&self.value)
    }
}
