//! Convenient re-exports for common usage patterns.
//!
//! This module provides a single import to bring all commonly used types
//! into scope.
//!
//! # Example
//!
//! ```ignore
//! use sqlkv::prelude::*;
//!
//! let mut store = KvStore::open("sqlite:///kv_db.db")?;
//! store.insert("count", 42)?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Codec types
pub use crate::codec::{Codec, CodecError, IntegerLayout, IntoValue, Value};
pub use crate::codec::{decode_integer, decode_text, encode};

// KV store types
pub use crate::kv::{Batch, ConnectionTarget, Entry, KeyList, KvError, KvStore, StoreOptions};

// Settings
pub use crate::settings::{Settings, SettingsError};
