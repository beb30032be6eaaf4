//! Unified error type for the sqlkv library.
//!
//! This module provides a single [`Error`] type that encompasses all errors
//! that can occur in the library, making it easier to handle errors in
//! application code.

use thiserror::Error;

use crate::codec::CodecError;
use crate::kv::KvError;
use crate::settings::SettingsError;

/// Unified error type for all sqlkv operations.
///
/// # Example
///
/// ```ignore
/// use sqlkv::{KvStore, Result, Settings};
///
/// fn do_something() -> Result<()> {
///     let settings = Settings::load_or_default("settings.json")?;
///     let mut store = KvStore::from_settings(&settings)?;
///     store.insert("greeting", "hello")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Error from value encoding or decoding.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Error from key-value store operations.
    #[error(transparent)]
    Kv(#[from] KvError),

    /// Error loading the settings document.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a codec error, directly or inside a store error.
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Codec(_) | Self::Kv(KvError::Codec(_)))
    }

    /// Returns `true` if this is a KV store error.
    pub fn is_kv(&self) -> bool {
        matches!(self, Self::Kv(_))
    }

    /// Returns `true` if this is a settings error.
    pub fn is_settings(&self) -> bool {
        matches!(self, Self::Settings(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let err: Error = KvError::Codec(CodecError::unsupported("float")).into();
        assert!(err.is_kv());
        assert!(err.is_codec());
        assert_eq!(err.to_string(), "Encoding error: Unsupported value type: float");

        let err: Error = CodecError::EmptyInteger.into();
        assert!(err.is_codec());
        assert!(!err.is_kv());

        let err: Error = SettingsError::Io(
            "settings.json".to_string(),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        )
        .into();
        assert!(err.is_settings());
    }
}
