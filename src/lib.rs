//! Key-value storage over a single relational table.
//!
//! Values are converted to a canonical byte form by the [`codec`] module and
//! persisted by [`KvStore`] in a table of `(id, key, value)` rows, one row
//! per unique key.
//!
//! # Quick Start
//!
//! ```ignore
//! use sqlkv::prelude::*;
//!
//! let mut store = KvStore::open("sqlite:///kv_db.db")?;
//!
//! store.insert("1", "original")?;
//! store.insert("2", 1)?;
//! assert_eq!(store.get("2")?.map(|e| e.decode_integer()).transpose()?, Some(1));
//!
//! store.update("1", "updated")?;
//! store.remove(&["1", "2"])?;
//! assert!(store.get_all()?.is_empty());
//! ```
//!
//! # Modules
//!
//! - [`codec`] - Value encoding: UTF-8 text, little-endian integers, raw bytes
//! - [`kv`] - The store, its table schema and connection targets
//! - [`settings`] - Settings file loading and connection string assembly
//!
//! # Feature Flags
//!
//! - `logging` - Enable library-level tracing (enabled by default; consumers provide their own subscriber)
//! - `cli` - Enable the command-line interface binary
//! - `full` - Enable all features

pub mod codec;
pub mod kv;
mod logging;
pub mod prelude;
pub mod settings;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export commonly used types at crate root for convenience
pub use codec::{Codec, CodecError, IntegerLayout, IntoValue, Value};
pub use kv::{Batch, ConnectionTarget, Entry, KeyList, KvError, KvStore, StoreOptions};
pub use settings::{Settings, SettingsError};
