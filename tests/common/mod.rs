//! Common test utilities and fixtures.

#![allow(dead_code)]

use tempfile::TempDir;

use sqlkv::{KvError, KvStore};

/// Open a fresh in-memory store.
pub fn memory_store() -> Result<KvStore, KvError> {
    KvStore::open("sqlite://")
}

/// Create a temporary directory and a connection target for a database file inside it.
///
/// The directory is deleted when the returned [`TempDir`] is dropped.
pub fn temp_store_target(name: &str) -> Result<(TempDir, String), std::io::Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(format!("{}.db", name));
    let target = format!("sqlite:///{}", path.display());
    Ok((dir, target))
}
