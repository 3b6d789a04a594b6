//! Key-value storage backends for persisted store state.
//!
//! # Responsibility
//! - Define the string key/value contract the note store flushes into.
//! - Provide a SQLite-backed implementation and an in-memory one.
//!
//! # Invariants
//! - `set_item` replaces the whole value for a key in one statement.
//! - `get_item` on an unknown key returns `Ok(None)`, never an error.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// SQLite transport or bootstrap failure.
    Db(DbError),
    /// Backend refused the operation (e.g. disk full, test doubles).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string key/value storage.
pub trait StateStorage {
    /// Returns the stored value for `key`, if any.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes `key`. Removing an absent key succeeds.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// SQLite-backed storage over the `kv_store` table.
pub struct SqliteStateStorage {
    conn: Connection,
}

impl SqliteStateStorage {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Gives read access to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StateStorage for SqliteStateStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local storage; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStateStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStateStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStateStorage, SqliteStateStorage, StateStorage};

    #[test]
    fn sqlite_set_item_replaces_previous_value() {
        let storage = SqliteStateStorage::open_in_memory().unwrap();
        storage.set_item("k", "one").unwrap();
        storage.set_item("k", "two").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("two"));

        let rows: i64 = storage
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn sqlite_remove_item_is_idempotent() {
        let storage = SqliteStateStorage::open_in_memory().unwrap();
        storage.set_item("k", "v").unwrap();
        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn memory_storage_missing_key_is_none() {
        let storage = MemoryStateStorage::new();
        assert_eq!(storage.get_item("absent").unwrap(), None);
        storage.set_item("present", "1").unwrap();
        assert_eq!(storage.get_item("present").unwrap().as_deref(), Some("1"));
    }
}
