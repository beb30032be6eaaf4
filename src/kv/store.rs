//! KV Store implementation over a single SQLite table.

use std::collections::HashSet;

use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use crate::codec::{Codec, IntegerLayout, IntoValue};
use crate::logging::{debug, info, trace, warn};
use crate::settings::Settings;

use super::error::{KvError, classify_write_error};
use super::schema::{MAX_PARAMS, TableSchema};
use super::target::ConnectionTarget;
use super::types::Entry;

/// Options applied when opening a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Table holding the entries.
    pub schema: TableSchema,
    /// Layout used when encoding integer values.
    pub integer_layout: IntegerLayout,
}

impl StoreOptions {
    /// Use a different table name.
    pub fn table(mut self, name: impl Into<String>) -> Result<Self, KvError> {
        self.schema = TableSchema::new(name)?;
        Ok(self)
    }

    /// Use a different integer layout.
    pub fn integer_layout(mut self, layout: IntegerLayout) -> Self {
        self.integer_layout = layout;
        self
    }
}

/// Key-value store backed by one relational table.
///
/// A store owns exactly one connection. Every call runs to completion,
/// including commit or rollback, before it returns. Writes take `&mut self`
/// and the connection is not `Sync`, so sharing a store across threads
/// requires external synchronization.
pub struct KvStore {
    conn: Connection,
    schema: TableSchema,
    codec: Codec,
    target: ConnectionTarget,
}

impl KvStore {
    /// Open the store at `target` with default options, creating the table if needed.
    pub fn open(target: &str) -> Result<Self, KvError> {
        Self::open_with(target, StoreOptions::default())
    }

    /// Open the store at `target`, creating the table if needed.
    ///
    /// Table creation never touches an existing table or its rows.
    pub fn open_with(target: &str, options: StoreOptions) -> Result<Self, KvError> {
        let target = ConnectionTarget::parse(target)?;

        let conn = match &target {
            ConnectionTarget::File(path) => Connection::open(path),
            ConnectionTarget::Memory => Connection::open_in_memory(),
        }
        .map_err(|e| KvError::connection(format!("cannot open {}: {}", target, e)))?;

        conn.execute_batch(&options.schema.create_sql())
            .map_err(|e| {
                KvError::connection(format!(
                    "cannot prepare table '{}' in {}: {}",
                    options.schema.table(),
                    target,
                    e
                ))
            })?;

        info!(
            location = %target,
            table = options.schema.table(),
            integer_layout = %options.integer_layout,
            "opened store"
        );

        Ok(Self {
            conn,
            schema: options.schema,
            codec: Codec::new(options.integer_layout),
            target,
        })
    }

    /// Open the store described by a settings document.
    pub fn from_settings(settings: &Settings) -> Result<Self, KvError> {
        Self::open_with(&settings.connection_string(), settings.store_options()?)
    }

    /// The target this store was opened with.
    pub fn connection_target(&self) -> &ConnectionTarget {
        &self.target
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Get the entry for `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<Entry>, KvError> {
        debug!(key = key, "getting entry");
        let entry = self
            .conn
            .query_row(&self.schema.select_one_sql(), params![key], entry_from_row)
            .optional()?;
        Ok(entry)
    }

    /// Get every entry in insertion order.
    pub fn get_all(&self) -> Result<Vec<Entry>, KvError> {
        let mut stmt = self.conn.prepare(&self.schema.select_all_sql())?;
        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = entries.len(), "listed all entries");
        Ok(entries)
    }

    /// Get the entries whose key appears in `keys`, in insertion order.
    ///
    /// Keys without an entry are skipped, and a key listed twice is returned once.
    pub fn get_multiple<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<Entry>, KvError> {
        let keys = unique_keys(keys);
        let mut entries = Vec::with_capacity(keys.len());

        for chunk in keys.chunks(MAX_PARAMS) {
            let mut stmt = self.conn.prepare(&self.schema.select_in_sql(chunk.len()))?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), entry_from_row)?;
            for row in rows {
                entries.push(row?);
            }
        }

        entries.sort_by_key(|e| e.id);
        debug!(requested = keys.len(), found = entries.len(), "got multiple entries");
        Ok(entries)
    }

    /// Insert a new entry. Fails with [`KvError::ConstraintViolation`] if the key exists.
    ///
    /// On failure nothing is written.
    pub fn insert<V: IntoValue>(&mut self, key: &str, value: V) -> Result<(), KvError> {
        let result = self.try_insert(key, value);
        match &result {
            Ok(()) => debug!(key = key, "inserted entry"),
            Err(e) => warn!(key = key, error = %e, "insert rolled back"),
        }
        result
    }

    fn try_insert<V: IntoValue>(&mut self, key: &str, value: V) -> Result<(), KvError> {
        let bytes = self.codec.encode(value)?;
        let tx = self.conn.transaction()?;
        tx.execute(&self.schema.insert_sql(), params![key, bytes])
            .map_err(|e| classify_write_error(e, key))?;
        tx.commit()?;
        Ok(())
    }

    /// Insert a batch of new entries atomically, returning how many were written.
    ///
    /// Every value is encoded and staged inside one transaction. If any value
    /// cannot be encoded or any key already exists (in the table or earlier in
    /// the batch), the whole batch is rolled back.
    pub fn insert_multiple<I, K, V>(&mut self, entries: I) -> Result<usize, KvError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoValue,
    {
        let result = self.try_insert_multiple(entries);
        match &result {
            Ok(count) => debug!(count = count, "inserted batch"),
            Err(e) => warn!(error = %e, "batch insert rolled back"),
        }
        result
    }

    fn try_insert_multiple<I, K, V>(&mut self, entries: I) -> Result<usize, KvError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoValue,
    {
        let tx = self.conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(&self.schema.insert_sql())?;
            for (key, value) in entries {
                let key = key.as_ref();
                let bytes = self.codec.encode(value)?;
                stmt.execute(params![key, bytes])
                    .map_err(|e| classify_write_error(e, key))?;
                trace!(key = key, "staged batch entry");
                count += 1;
            }
        }
        tx.commit()?;
        Ok(count)
    }

    /// Replace the value of an existing entry. The key is left unchanged.
    ///
    /// Fails with [`KvError::NotFound`] if no entry exists for `key`.
    pub fn update<V: IntoValue>(&mut self, key: &str, value: V) -> Result<(), KvError> {
        let result = self.try_update(key, value);
        match &result {
            Ok(()) => debug!(key = key, "updated entry"),
            Err(e) => warn!(key = key, error = %e, "update rolled back"),
        }
        result
    }

    fn try_update<V: IntoValue>(&mut self, key: &str, value: V) -> Result<(), KvError> {
        let bytes = self.codec.encode(value)?;
        let tx = self.conn.transaction()?;
        let changed = tx.execute(&self.schema.update_sql(), params![key, bytes])?;
        if changed == 0 {
            return Err(KvError::NotFound(key.to_string()));
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete the entries for `keys`, returning how many were removed.
    ///
    /// Keys without an entry are ignored. All deletes commit together.
    pub fn remove<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<usize, KvError> {
        let keys = unique_keys(keys);
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        for chunk in keys.chunks(MAX_PARAMS) {
            removed += tx.execute(
                &self.schema.delete_in_sql(chunk.len()),
                params_from_iter(chunk.iter()),
            )?;
        }
        tx.commit()?;
        debug!(requested = keys.len(), removed = removed, "removed entries");
        Ok(removed)
    }

    /// Number of entries in the table.
    pub fn len(&self) -> Result<usize, KvError> {
        let count: i64 = self
            .conn
            .query_row(&self.schema.count_sql(), [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    pub fn is_empty(&self) -> Result<bool, KvError> {
        Ok(self.len()? == 0)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        key: row.get(1)?,
        value: row.get(2)?,
    })
}

/// Deduplicate keys, keeping first-seen order.
fn unique_keys<S: AsRef<str>>(keys: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    keys.iter()
        .map(AsRef::as_ref)
        .filter(|k| seen.insert(*k))
        .collect()
}
