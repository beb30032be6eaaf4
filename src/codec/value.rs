//! Typed input values accepted by the codec.

use super::error::CodecError;

/// A value that can be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// UTF-8 text, stored without a length prefix or type tag.
    Text(String),
    /// Signed integer, stored little-endian in the configured layout.
    Integer(i64),
    /// Pre-serialized payload, stored verbatim.
    Bytes(Vec<u8>),
}

impl Value {
    /// Name of the variant, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Bytes(_) => "bytes",
        }
    }
}

/// Conversion into a storable [`Value`].
///
/// Statically typed inputs always convert. Dynamic inputs such as
/// [`serde_json::Value`] are checked at runtime and rejected with
/// [`CodecError::UnsupportedType`] when they are neither text nor an integer.
pub trait IntoValue {
    fn into_value(self) -> Result<Value, CodecError>;
}

impl IntoValue for Value {
    fn into_value(self) -> Result<Value, CodecError> {
        Ok(self)
    }
}

impl IntoValue for &Value {
    fn into_value(self) -> Result<Value, CodecError> {
        Ok(self.clone())
    }
}

impl IntoValue for String {
    fn into_value(self) -> Result<Value, CodecError> {
        Ok(Value::Text(self))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Result<Value, CodecError> {
        Ok(Value::Text(self.to_string()))
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Result<Value, CodecError> {
        Ok(Value::Text(self.clone()))
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Result<Value, CodecError> {
        Ok(Value::Bytes(self))
    }
}

impl IntoValue for &[u8] {
    fn into_value(self) -> Result<Value, CodecError> {
        Ok(Value::Bytes(self.to_vec()))
    }
}

macro_rules! impl_into_value_lossless {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Result<Value, CodecError> {
                    Ok(Value::Integer(i64::from(self)))
                }
            }
        )*
    };
}

impl_into_value_lossless!(i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for u64 {
    fn into_value(self) -> Result<Value, CodecError> {
        i64::try_from(self)
            .map(Value::Integer)
            .map_err(|_| CodecError::IntegerOutOfRange(self.to_string()))
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Result<Value, CodecError> {
        i64::try_from(self)
            .map(Value::Integer)
            .map_err(|_| CodecError::IntegerOutOfRange(self.to_string()))
    }
}

impl IntoValue for &serde_json::Value {
    fn into_value(self) -> Result<Value, CodecError> {
        use serde_json::Value as Json;

        match self {
            Json::String(s) => Ok(Value::Text(s.clone())),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Integer(i))
                } else if n.is_u64() {
                    Err(CodecError::IntegerOutOfRange(n.to_string()))
                } else {
                    Err(CodecError::unsupported("float"))
                }
            }
            Json::Null => Err(CodecError::unsupported("null")),
            Json::Bool(_) => Err(CodecError::unsupported("bool")),
            Json::Array(_) => Err(CodecError::unsupported("array")),
            Json::Object(_) => Err(CodecError::unsupported("object")),
        }
    }
}

impl IntoValue for serde_json::Value {
    fn into_value(self) -> Result<Value, CodecError> {
        match self {
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            other => (&other).into_value(),
        }
    }
}
