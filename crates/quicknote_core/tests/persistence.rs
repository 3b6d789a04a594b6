use quicknote_core::persist::{decode_notes, load_notes, unreadable_backup_key};
use quicknote_core::{
    open_note_store, Category, MemoryStateStorage, NoteStore, PersistError, SqliteStateStorage,
    StateStorage, StorageError, StorageResult, StoreConfig, NOTES_STORE_KEY,
};
use std::cell::Cell;

/// Backend whose writes fail while `failing` is set.
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStateStorage,
    failing: Cell<bool>,
    writes: Cell<usize>,
}

impl StateStorage for FlakyStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.writes.set(self.writes.get() + 1);
        if self.failing.get() {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key)
    }
}

#[test]
fn reopening_file_store_restores_notes_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::at(dir.path().join("notes.sqlite3"));

    let expected = {
        let mut store = open_note_store(&config).unwrap();
        let milk = store.add_note(Category::Life, "buy milk");
        store.add_note(Category::WorkAndStudy, "finish report");
        store.add_note(Category::HealthAndWellness, "stretch");
        store.update_note(milk.id, "buy oat milk");
        store.notes().to_vec()
    };

    let reopened = open_note_store(&config).unwrap();
    assert_eq!(reopened.notes(), expected.as_slice());
}

#[test]
fn every_mutation_is_flushed() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::at(dir.path().join("nested").join("notes.sqlite3"));
    let mut store = open_note_store(&config).unwrap();

    let note = store.add_note(Category::Life, "a");
    let persisted = load_notes(store.storage(), NOTES_STORE_KEY)
        .unwrap()
        .unwrap();
    assert_eq!(persisted, vec![note.clone()]);

    store.delete_note(note.id);
    let persisted = load_notes(store.storage(), NOTES_STORE_KEY)
        .unwrap()
        .unwrap();
    assert!(persisted.is_empty());
}

#[test]
fn hydrate_without_persisted_state_starts_empty() {
    let store = NoteStore::hydrate(SqliteStateStorage::open_in_memory().unwrap(), "persist:notes");
    assert!(store.is_empty());
    assert!(!store.has_unflushed_changes());
}

#[test]
fn hydrate_with_corrupt_payload_backs_it_up_before_next_write() {
    let storage = MemoryStateStorage::new();
    storage.set_item("persist:notes", "{not json").unwrap();

    let mut store = NoteStore::hydrate(storage, "persist:notes");
    assert!(store.is_empty());
    assert!(!store.writes_blocked());

    store.add_note(Category::Life, "fresh");
    let payload = store.storage().get_item("persist:notes").unwrap().unwrap();
    let notes = decode_notes(&payload).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "fresh");

    let backup = store
        .storage()
        .get_item(&unreadable_backup_key("persist:notes"))
        .unwrap();
    assert_eq!(backup.as_deref(), Some("{not json"));
}

#[test]
fn hydrate_with_future_version_starts_empty() {
    let storage = MemoryStateStorage::new();
    storage
        .set_item("persist:notes", r#"{"version":99,"notes":[]}"#)
        .unwrap();

    let store = NoteStore::hydrate(storage, "persist:notes");
    assert!(store.is_empty());
}

#[test]
fn future_version_notes_survive_first_add() {
    let original = r#"{"version":2,"notes":[{"id":"0b8a4c4e-1b0e-4d2e-9a59-2f6f3f0b6c11","category":"Life","content":"precious","createdAt":1}]}"#;
    let storage = MemoryStateStorage::new();
    storage.set_item("persist:notes", original).unwrap();

    let mut store = NoteStore::hydrate(storage, "persist:notes");
    store.add_note(Category::Life, "new");

    let backup = store
        .storage()
        .get_item("persist:notes.unreadable")
        .unwrap()
        .unwrap();
    assert_eq!(backup, original);
    assert!(backup.contains("precious"));
}

#[test]
fn failed_backup_blocks_writes_until_unblocked() {
    let storage = FlakyStorage::default();
    storage.inner.set_item("k", "{not json").unwrap();
    storage.failing.set(true);

    let mut store = NoteStore::hydrate(storage, "k");
    assert!(store.writes_blocked());

    store.storage().failing.set(false);
    store.add_note(Category::Life, "held in memory");
    assert_eq!(store.len(), 1);
    assert!(store.has_unflushed_changes());
    assert_eq!(
        store.storage().inner.get_item("k").unwrap().as_deref(),
        Some("{not json")
    );
    assert!(matches!(store.flush(), Err(PersistError::WritesBlocked)));

    store.unblock_writes();
    store.flush().unwrap();
    assert!(!store.has_unflushed_changes());
    let persisted = load_notes(&store.storage().inner, "k").unwrap().unwrap();
    assert_eq!(persisted[0].content, "held in memory");
}

#[test]
fn failed_flush_is_non_fatal_and_retried_by_next_mutation() {
    let storage = FlakyStorage::default();
    storage.failing.set(true);
    let mut store = NoteStore::hydrate(storage, "k");

    let note = store.add_note(Category::WorkAndStudy, "kept in memory");
    assert_eq!(store.notes(), &[note.clone()]);
    assert!(store.has_unflushed_changes());
    assert_eq!(store.storage().inner.get_item("k").unwrap(), None);

    store.storage().failing.set(false);
    store.update_note(uuid::Uuid::new_v4(), "no such note");
    assert!(!store.has_unflushed_changes());

    let persisted = load_notes(&store.storage().inner, "k").unwrap().unwrap();
    assert_eq!(persisted, vec![note]);
}

#[test]
fn explicit_flush_reports_storage_error() {
    let storage = FlakyStorage::default();
    let mut store = NoteStore::hydrate(storage, "k");
    store.storage().failing.set(true);

    assert!(store.flush().is_err());
    assert!(store.has_unflushed_changes());

    store.storage().failing.set(false);
    store.flush().unwrap();
    assert!(!store.has_unflushed_changes());
    assert_eq!(store.into_storage().writes.get(), 2);
}

#[test]
fn separate_keys_do_not_share_state() {
    let storage = MemoryStateStorage::new();
    let mut store = NoteStore::hydrate(storage, "a");
    store.add_note(Category::Life, "only in a");

    let storage = store.into_storage();
    let other = NoteStore::hydrate(storage, "b");
    assert!(other.is_empty());
}
