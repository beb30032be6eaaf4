//! Table schema owned by a store instance.

use super::error::KvError;

/// Default table name.
pub const DEFAULT_TABLE: &str = "kvtable";

/// Upper bound on bound parameters per statement (SQLite's historical limit is 999).
pub(crate) const MAX_PARAMS: usize = 500;

/// The key-value table: `id` integer primary key, unique `key` text, `value` blob.
///
/// Statements are rendered once per store so the validated table name is the
/// only identifier ever interpolated into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    table: String,
}

impl TableSchema {
    /// Create a schema for the given table name.
    ///
    /// Names are limited to ASCII letters, digits and `_`, and may not start
    /// with a digit.
    pub fn new(table: impl Into<String>) -> Result<Self, KvError> {
        let table = table.into();
        let mut chars = table.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(KvError::invalid_argument(format!(
                "invalid table name '{}'",
                table
            )));
        }
        Ok(Self { table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub(crate) fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\
             id INTEGER PRIMARY KEY AUTOINCREMENT, \
             key TEXT NOT NULL UNIQUE, \
             value BLOB NOT NULL)",
            self.table
        )
    }

    pub(crate) fn select_one_sql(&self) -> String {
        format!("SELECT id, key, value FROM \"{}\" WHERE key = ?1 LIMIT 1", self.table)
    }

    pub(crate) fn select_all_sql(&self) -> String {
        format!("SELECT id, key, value FROM \"{}\" ORDER BY id", self.table)
    }

    pub(crate) fn select_in_sql(&self, count: usize) -> String {
        format!(
            "SELECT id, key, value FROM \"{}\" WHERE key IN ({}) ORDER BY id",
            self.table,
            placeholders(count)
        )
    }

    pub(crate) fn insert_sql(&self) -> String {
        format!("INSERT INTO \"{}\" (key, value) VALUES (?1, ?2)", self.table)
    }

    pub(crate) fn update_sql(&self) -> String {
        format!("UPDATE \"{}\" SET value = ?2 WHERE key = ?1", self.table)
    }

    pub(crate) fn delete_in_sql(&self, count: usize) -> String {
        format!(
            "DELETE FROM \"{}\" WHERE key IN ({})",
            self.table,
            placeholders(count)
        )
    }

    pub(crate) fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM \"{}\"", self.table)
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
