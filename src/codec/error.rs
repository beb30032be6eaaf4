//! Error types for value encoding and decoding.

use thiserror::Error;

/// Errors that can occur while converting values to and from storage bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Unsupported value type: {type_name}")]
    UnsupportedType { type_name: String },

    #[error("Negative integer {0} cannot be written with the legacy integer layout")]
    NegativeInteger(i64),

    #[error("Integer out of range: {0}")]
    IntegerOutOfRange(String),

    #[error("Cannot decode an integer from an empty byte sequence")]
    EmptyInteger,

    #[error("Invalid UTF-8 in stored text")]
    InvalidUtf8,
}

impl CodecError {
    /// Create an unsupported-type error for the named input type.
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }
}
