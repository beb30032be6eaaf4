//! Little-endian integer layouts.
//!
//! Two layouts exist for writing integers. Both are read back by the same
//! sign-extending decoder: legacy output never sets the top bit of its last
//! byte, so reading it as two's complement yields the original magnitude.

use serde::Deserialize;

use super::error::CodecError;

/// Width of the widest integer the codec works with.
const WORD_BYTES: usize = 8;

/// How integers are laid out in storage bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerLayout {
    /// Minimal two's-complement little-endian.
    #[default]
    Compact,
    /// Unsigned magnitude in `ceil((bit_length + 7) / 8)` bytes, little-endian.
    ///
    /// Over-allocates by one byte unless `bit_length % 8 == 1`. Kept for
    /// byte-compatibility with databases written that way.
    Legacy,
}

impl IntegerLayout {
    /// Encode an integer using this layout.
    pub fn encode(self, value: i64) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Compact => Ok(encode_compact(value)),
            Self::Legacy => encode_legacy(value),
        }
    }

    /// Number of bytes this layout produces for `value`.
    pub fn encoded_len(self, value: i64) -> Result<usize, CodecError> {
        match self {
            Self::Compact => Ok(compact_len(value)),
            Self::Legacy => {
                if value < 0 {
                    return Err(CodecError::NegativeInteger(value));
                }
                Ok(legacy_len(value.unsigned_abs()))
            }
        }
    }
}

impl std::str::FromStr for IntegerLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown integer layout '{}'", other)),
        }
    }
}

impl std::fmt::Display for IntegerLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

fn compact_len(value: i64) -> usize {
    // Significant bits plus one sign bit.
    let redundant = if value < 0 {
        value.leading_ones()
    } else {
        value.leading_zeros()
    };
    let bits = (64 - redundant) as usize + 1;
    bits.div_ceil(8).clamp(1, WORD_BYTES)
}

fn encode_compact(value: i64) -> Vec<u8> {
    let len = compact_len(value);
    value.to_le_bytes().into_iter().take(len).collect()
}

fn legacy_len(magnitude: u64) -> usize {
    let bit_length = (64 - magnitude.leading_zeros()) as usize;
    (bit_length + 7).div_ceil(8)
}

fn encode_legacy(value: i64) -> Result<Vec<u8>, CodecError> {
    if value < 0 {
        return Err(CodecError::NegativeInteger(value));
    }
    let magnitude = value.unsigned_abs();
    let mut bytes = magnitude.to_le_bytes().to_vec();
    bytes.resize(legacy_len(magnitude), 0);
    Ok(bytes)
}

/// Decode a little-endian two's-complement integer of any layout.
///
/// Bytes beyond the eighth must be zero padding, as produced by the legacy
/// layout for values with a 58 bit or longer magnitude.
pub fn decode_integer(bytes: &[u8]) -> Result<i64, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInteger);
    }

    let (word, padding) = bytes.split_at(bytes.len().min(WORD_BYTES));
    if padding.iter().any(|&b| b != 0) {
        return Err(CodecError::IntegerOutOfRange(format!(
            "{} byte integer does not fit in 64 bits",
            bytes.len()
        )));
    }

    let negative = word.last().is_some_and(|&b| b & 0x80 != 0);
    if negative && !padding.is_empty() {
        return Err(CodecError::IntegerOutOfRange(
            "zero-padded integer exceeds i64::MAX".to_string(),
        ));
    }

    let fill = if negative { 0xff } else { 0x00 };
    let mut buf = [fill; WORD_BYTES];
    for (slot, &b) in buf.iter_mut().zip(word) {
        *slot = b;
    }
    Ok(i64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_lengths() {
        assert_eq!(encode_compact(0), vec![0x00]);
        assert_eq!(encode_compact(1), vec![0x01]);
        assert_eq!(encode_compact(127), vec![0x7f]);
        assert_eq!(encode_compact(128), vec![0x80, 0x00]);
        assert_eq!(encode_compact(255), vec![0xff, 0x00]);
        assert_eq!(encode_compact(256), vec![0x00, 0x01]);
        assert_eq!(encode_compact(-1), vec![0xff]);
        assert_eq!(encode_compact(-128), vec![0x80]);
        assert_eq!(encode_compact(-129), vec![0x7f, 0xff]);
        assert_eq!(encode_compact(i64::MAX).len(), 8);
        assert_eq!(encode_compact(i64::MIN).len(), 8);
    }

    #[test]
    fn test_legacy_formula() {
        // ceil((bit_length + 7) / 8)
        assert_eq!(encode_legacy(0).unwrap(), vec![0x00]);
        assert_eq!(encode_legacy(1).unwrap(), vec![0x01]);
        assert_eq!(encode_legacy(2).unwrap(), vec![0x02, 0x00]);
        assert_eq!(encode_legacy(127).unwrap(), vec![0x7f, 0x00]);
        assert_eq!(encode_legacy(255).unwrap(), vec![0xff, 0x00]);
        assert_eq!(encode_legacy(256).unwrap(), vec![0x00, 0x01]);
        assert_eq!(encode_legacy(i64::MAX).unwrap().len(), 9);
    }

    #[test]
    fn test_legacy_rejects_negative() {
        assert_eq!(encode_legacy(-5), Err(CodecError::NegativeInteger(-5)));
        assert_eq!(
            IntegerLayout::Legacy.encoded_len(-1),
            Err(CodecError::NegativeInteger(-1))
        );
    }

    #[test]
    fn test_decode_both_layouts() {
        for v in [0i64, 1, 2, 127, 128, 255, 256, 65_535, i64::MAX] {
            let compact = IntegerLayout::Compact.encode(v).unwrap();
            let legacy = IntegerLayout::Legacy.encode(v).unwrap();
            assert_eq!(decode_integer(&compact).unwrap(), v);
            assert_eq!(decode_integer(&legacy).unwrap(), v);
        }
        assert_eq!(decode_integer(&[0xff]).unwrap(), -1);
        assert_eq!(decode_integer(&[0x7f, 0xff]).unwrap(), -129);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode_integer(&[]), Err(CodecError::EmptyInteger));
        assert!(matches!(
            decode_integer(&[0, 0, 0, 0, 0, 0, 0, 0, 1]),
            Err(CodecError::IntegerOutOfRange(_))
        ));
        assert!(matches!(
            decode_integer(&[0, 0, 0, 0, 0, 0, 0, 0x80, 0]),
            Err(CodecError::IntegerOutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_layout() {
        assert_eq!("compact".parse::<IntegerLayout>(), Ok(IntegerLayout::Compact));
        assert_eq!("LEGACY".parse::<IntegerLayout>(), Ok(IntegerLayout::Legacy));
        assert!("varint".parse::<IntegerLayout>().is_err());
        assert_eq!(IntegerLayout::Legacy.to_string(), "legacy");
    }
}
