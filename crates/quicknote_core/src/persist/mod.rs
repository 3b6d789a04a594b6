//! Persisted store state.
//!
//! # Responsibility
//! - Encode the full note collection into one versioned JSON value.
//! - Load and save that value through a `StateStorage` backend.
//!
//! # Invariants
//! - Round-trip preserves every note field and the collection order.
//! - A payload written by a newer format version is rejected, not migrated.
//! - A rejected payload is copied aside before anything overwrites its key.

pub mod storage;

use crate::model::note::Note;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use storage::{StateStorage, StorageError};

/// Fixed key the note collection is stored under.
pub const NOTES_STORE_KEY: &str = "persist:notes";

/// Current payload format version.
pub const PERSIST_FORMAT_VERSION: u32 = 1;

pub type PersistResult<T> = Result<T, PersistError>;

/// Failure to load or save persisted store state.
#[derive(Debug)]
pub enum PersistError {
    Storage(StorageError),
    /// Stored payload is not a valid envelope.
    Decode(serde_json::Error),
    /// Payload was written by a newer format.
    UnsupportedVersion { found: u32, latest_supported: u32 },
    /// Writes are held back because unreadable state could not be preserved.
    WritesBlocked,
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "invalid persisted notes payload: {err}"),
            Self::UnsupportedVersion {
                found,
                latest_supported,
            } => write!(
                f,
                "persisted notes version {found} is newer than supported {latest_supported}"
            ),
            Self::WritesBlocked => write!(
                f,
                "writes blocked: unreadable persisted notes were not backed up"
            ),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::UnsupportedVersion { .. } | Self::WritesBlocked => None,
        }
    }
}

impl From<StorageError> for PersistError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    notes: &'a [Note],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    #[serde(default)]
    notes: Vec<Note>,
}

/// Key holding a copy of a payload that failed to load from `key`.
pub fn unreadable_backup_key(key: &str) -> String {
    format!("{key}.unreadable")
}

/// Copies the raw payload under `key` to `unreadable_backup_key(key)`.
///
/// Returns the backup key, or `None` when `key` holds nothing.
pub fn preserve_unreadable<S: StateStorage + ?Sized>(
    storage: &S,
    key: &str,
) -> PersistResult<Option<String>> {
    let Some(payload) = storage.get_item(key)? else {
        return Ok(None);
    };
    let backup_key = unreadable_backup_key(key);
    storage.set_item(&backup_key, &payload)?;
    Ok(Some(backup_key))
}

/// Serializes notes into the persisted envelope.
pub fn encode_notes(notes: &[Note]) -> PersistResult<String> {
    let payload = serde_json::to_string(&EnvelopeRef {
        version: PERSIST_FORMAT_VERSION,
        notes,
    })?;
    Ok(payload)
}

/// Parses a persisted envelope.
pub fn decode_notes(payload: &str) -> PersistResult<Vec<Note>> {
    let envelope: Envelope = serde_json::from_str(payload)?;
    if envelope.version > PERSIST_FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: envelope.version,
            latest_supported: PERSIST_FORMAT_VERSION,
        });
    }
    Ok(envelope.notes)
}

/// Reads notes under `key`. `Ok(None)` means nothing was ever persisted.
pub fn load_notes<S: StateStorage + ?Sized>(
    storage: &S,
    key: &str,
) -> PersistResult<Option<Vec<Note>>> {
    match storage.get_item(key)? {
        Some(payload) => decode_notes(&payload).map(Some),
        None => Ok(None),
    }
}

/// Writes the full collection under `key`.
pub fn save_notes<S: StateStorage + ?Sized>(
    storage: &S,
    key: &str,
    notes: &[Note],
) -> PersistResult<()> {
    let payload = encode_notes(notes)?;
    storage.set_item(key, &payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{decode_notes, encode_notes, preserve_unreadable, PersistError};
    use crate::model::category::Category;
    use crate::model::note::Note;
    use crate::persist::storage::{MemoryStateStorage, StateStorage};

    #[test]
    fn preserve_unreadable_copies_raw_payload() {
        let storage = MemoryStateStorage::new();
        assert_eq!(preserve_unreadable(&storage, "k").unwrap(), None);

        storage.set_item("k", "{broken").unwrap();
        let backup_key = preserve_unreadable(&storage, "k").unwrap().unwrap();
        assert_eq!(backup_key, "k.unreadable");
        assert_eq!(
            storage.get_item("k.unreadable").unwrap().as_deref(),
            Some("{broken")
        );
    }

    #[test]
    fn decode_rejects_newer_version() {
        let err = decode_notes(r#"{"version":2,"notes":[]}"#).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedVersion {
                found: 2,
                latest_supported: 1
            }
        ));
    }

    #[test]
    fn decode_rejects_unknown_category() {
        let payload = r#"{"version":1,"notes":[{
            "id":"0b8a4c4e-1b0e-4d2e-9a59-2f6f3f0b6c11",
            "category":"Hobbies",
            "content":"x",
            "createdAt":1
        }]}"#;
        assert!(matches!(
            decode_notes(payload).unwrap_err(),
            PersistError::Decode(_)
        ));
    }

    #[test]
    fn encoded_payload_carries_version_and_notes() {
        let note = Note::new(Category::WorkAndStudy, "finish report", 42);
        let payload = encode_notes(std::slice::from_ref(&note)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["notes"][0]["id"], note.id.to_string());
        assert_eq!(value["notes"][0]["category"], "WorkAndStudy");
        assert_eq!(value["notes"][0]["createdAt"], 42);
    }
}
