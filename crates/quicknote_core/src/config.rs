//! Store configuration.
//!
//! # Responsibility
//! - Resolve where persisted store state lives and under which key.
//!
//! # Invariants
//! - `QUICKNOTE_DB_PATH` wins when set to a non-blank value.
//! - Resolution never fails; it falls back to the temp directory.

use crate::persist::NOTES_STORE_KEY;
use std::path::PathBuf;

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "QUICKNOTE_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "quicknote.sqlite3";

/// Location of persisted store state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite file holding the key/value table.
    pub db_path: PathBuf,
    /// Key the note collection is stored under.
    pub store_key: String,
}

impl StoreConfig {
    /// Builds a config for an explicit database path and the default key.
    pub fn at(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            store_key: NOTES_STORE_KEY.to_string(),
        }
    }

    /// Resolves the config from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(DB_PATH_ENV).ok())
    }

    fn from_env_value(raw: Option<String>) -> Self {
        let db_path = raw
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        Self::at(db_path)
    }
}
