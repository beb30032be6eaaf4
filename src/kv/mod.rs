//! Key-value store over a single relational table.
//!
//! Each store owns one connection and one table of `(id, key, value)` rows.
//! Values are encoded with [`crate::codec`] on every write. Every write runs
//! in its own transaction and is rolled back as a unit on failure.

mod error;
mod input;
mod schema;
mod store;
mod target;
mod types;

pub use error::KvError;
pub use input::{Batch, KeyList};
pub use schema::{DEFAULT_TABLE, TableSchema};
pub use store::{KvStore, StoreOptions};
pub use target::ConnectionTarget;
pub use types::Entry;
