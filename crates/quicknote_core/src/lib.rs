//! Core domain logic for QuickNote.
//! This crate is the single source of truth for note store invariants.

pub mod config;
pub mod db;
pub mod l10n;
pub mod logging;
pub mod model;
pub mod persist;
pub mod store;
pub mod view;

pub use config::StoreConfig;
pub use l10n::{CategoryLabels, EnglishLabels};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::Category;
pub use model::note::{
    now_epoch_ms, validate_note_content, Note, NoteId, NoteInputError, NOTE_CONTENT_MAX_CHARS,
};
pub use persist::storage::{
    MemoryStateStorage, SqliteStateStorage, StateStorage, StorageError, StorageResult,
};
pub use persist::{PersistError, PersistResult, NOTES_STORE_KEY};
pub use store::note_store::{Clock, NoteStore};
pub use view::CategorySummary;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Opens the SQLite-backed store described by `config`.
///
/// # Errors
/// - Returns `StorageError` when the database cannot be opened or migrated.
///   Undecodable persisted notes are not an error; see `NoteStore::hydrate`.
pub fn open_note_store(config: &StoreConfig) -> StorageResult<NoteStore<SqliteStateStorage>> {
    let storage = SqliteStateStorage::open(&config.db_path)?;
    Ok(NoteStore::hydrate(storage, config.store_key.as_str()))
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
