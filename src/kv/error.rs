//! Error types for the KV store module.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors that can occur during KV store operations.
#[derive(Error, Debug)]
pub enum KvError {
    #[error("Encoding error: {0}")]
    Codec(#[from] CodecError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Key already exists: {key}")]
    ConstraintViolation { key: String },

    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl KvError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Returns `true` if a unique key constraint rejected the write.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }

    /// Returns `true` if the operation targeted a key that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Map a failed statement to a constraint violation when SQLite reports one.
pub(crate) fn classify_write_error(err: rusqlite::Error, key: &str) -> KvError {
    match err.sqlite_error_code() {
        Some(rusqlite::ErrorCode::ConstraintViolation) => KvError::ConstraintViolation {
            key: key.to_string(),
        },
        _ => KvError::Sqlite(err),
    }
}
