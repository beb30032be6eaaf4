//! Value encoding and decoding.
//!
//! Converts typed values into the canonical byte representation written to
//! the `value` column, and back.
//!
//! Stored bytes carry no type tag. Text is plain UTF-8 and integers are bare
//! little-endian words, so a reader must already know which decoder to use.

mod error;
mod integer;
mod value;

pub use error::CodecError;
pub use integer::{IntegerLayout, decode_integer};
pub use value::{IntoValue, Value};

use crate::logging::trace;

/// Encoder configured with an integer layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    layout: IntegerLayout,
}

impl Codec {
    pub const fn new(layout: IntegerLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> IntegerLayout {
        self.layout
    }

    /// Convert an input into a [`Value`] and encode it.
    pub fn encode<V: IntoValue>(&self, input: V) -> Result<Vec<u8>, CodecError> {
        let value = input.into_value()?;
        self.encode_value(&value)
    }

    /// Encode an already typed [`Value`].
    pub fn encode_value(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let bytes = match value {
            Value::Text(s) => s.as_bytes().to_vec(),
            Value::Integer(i) => self.layout.encode(*i)?,
            Value::Bytes(b) => b.clone(),
        };
        trace!(kind = value.kind(), len = bytes.len(), "encoded value");
        Ok(bytes)
    }
}

/// Encode with the default (compact) integer layout.
pub fn encode<V: IntoValue>(input: V) -> Result<Vec<u8>, CodecError> {
    Codec::default().encode(input)
}

/// Decode bytes written from a text value.
pub fn decode_text(bytes: &[u8]) -> Result<String, CodecError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| CodecError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_plain_utf8() {
        let bytes = encode("S.O.S.").unwrap();
        assert_eq!(bytes, b"S.O.S.");
        assert_eq!(decode_text(&bytes).unwrap(), "S.O.S.");

        let bytes = encode("héllo").unwrap();
        assert_eq!(bytes.len(), 6);
        assert_eq!(decode_text(&bytes).unwrap(), "héllo");
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(decode_text(&[0xc3, 0x28]), Err(CodecError::InvalidUtf8));
    }

    #[test]
    fn test_layout_selection() {
        let legacy = Codec::new(IntegerLayout::Legacy);
        assert_eq!(legacy.layout(), IntegerLayout::Legacy);
        assert_eq!(legacy.encode(127).unwrap(), vec![0x7f, 0x00]);
        assert_eq!(Codec::default().encode(127).unwrap(), vec![0x7f]);
        assert_eq!(legacy.encode(-1), Err(CodecError::NegativeInteger(-1)));
    }

    #[test]
    fn test_bytes_pass_through() {
        let payload = vec![0x0a, 0x05, b'M', b'i', b'k', b'e', b'y'];
        assert_eq!(encode(payload.clone()).unwrap(), payload);
    }

    #[test]
    fn test_unsupported_json() {
        let err = encode(serde_json::json!(3.25)).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported value type: float");
    }
}
