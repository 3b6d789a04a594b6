//! Note store: canonical note collection plus its mutations and views.
//!
//! # Responsibility
//! - Own the newest-first note sequence for the running session.
//! - Write the full collection through to a `StateStorage` after changes.
//! - Hydrate once from persisted state at construction.
//!
//! # Invariants
//! - Note ids are unique across the sequence.
//! - `add_note` inserts at the front; other mutations keep relative order.
//! - Missing ids make `delete_note`/`update_note` silent no-ops.
//! - Persistence failures are logged and never fail a mutation; the next
//!   mutation (or `flush`) retries.
//! - State that fails to load is copied to a backup key before the first
//!   flush; if that copy fails, flushes stay blocked until `unblock_writes`.

use crate::model::category::Category;
use crate::model::note::{now_epoch_ms, Note, NoteId};
use crate::persist::storage::StateStorage;
use crate::persist::{load_notes, preserve_unreadable, save_notes, PersistError, PersistResult};
use crate::view::{group_by_category, summarize_by_category, CategorySummary};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

/// Source of creation timestamps in epoch milliseconds.
pub type Clock = fn() -> i64;

/// In-memory note collection backed by durable storage.
pub struct NoteStore<S: StateStorage> {
    storage: S,
    key: String,
    notes: Vec<Note>,
    clock: Clock,
    unflushed: bool,
    writes_blocked: bool,
}

impl<S: StateStorage> NoteStore<S> {
    /// Loads persisted notes under `key`, or starts empty.
    ///
    /// Unreadable or undecodable state is logged and replaced by an empty
    /// collection. The raw payload is first copied to
    /// `persist::unreadable_backup_key(key)`; when that copy fails the store
    /// keeps working in memory but refuses to flush.
    pub fn hydrate(storage: S, key: impl Into<String>) -> Self {
        Self::with_clock(storage, key, now_epoch_ms)
    }

    /// Same as `hydrate`, with a caller-provided clock.
    pub fn with_clock(storage: S, key: impl Into<String>, clock: Clock) -> Self {
        let key = key.into();
        let started_at = Instant::now();
        let (notes, writes_blocked) = match load_notes(&storage, &key) {
            Ok(Some(notes)) => {
                let notes = dedupe_by_id(notes);
                info!(
                    "event=store_hydrate module=store status=ok source=persisted notes={} duration_ms={}",
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                (notes, false)
            }
            Ok(None) => {
                info!(
                    "event=store_hydrate module=store status=ok source=empty notes=0 duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                (Vec::new(), false)
            }
            Err(err) => {
                warn!(
                    "event=store_hydrate module=store status=error error_code=hydrate_failed duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                (Vec::new(), !backup_unreadable(&storage, &key))
            }
        };

        Self {
            storage,
            key,
            notes,
            clock,
            unflushed: false,
            writes_blocked,
        }
    }

    /// Creates a note at the front of the collection and returns it.
    ///
    /// `content` is stored as given; length checks belong to the caller.
    pub fn add_note(&mut self, category: Category, content: impl Into<String>) -> Note {
        let mut note = Note::new(category, content, (self.clock)());
        while self.position(note.id).is_some() {
            note.id = NoteId::new_v4();
        }
        self.notes.insert(0, note.clone());
        debug!(
            "event=note_add module=store status=ok note_id={} category={}",
            note.id, note.category
        );
        self.flush_best_effort(true);
        note
    }

    /// Removes the note with `id`, if present.
    pub fn delete_note(&mut self, id: NoteId) {
        let changed = match self.position(id) {
            Some(index) => {
                self.notes.remove(index);
                debug!("event=note_delete module=store status=ok note_id={id}");
                true
            }
            None => {
                debug!("event=note_delete module=store status=noop note_id={id}");
                false
            }
        };
        self.flush_best_effort(changed);
    }

    /// Removes every note.
    pub fn delete_all_notes(&mut self) {
        let removed = self.notes.len();
        self.notes.clear();
        debug!("event=notes_delete_all module=store status=ok removed={removed}");
        self.flush_best_effort(removed > 0);
    }

    /// Replaces the content of the note with `id` in place, if present.
    pub fn update_note(&mut self, id: NoteId, content: impl Into<String>) {
        let changed = match self.position(id) {
            Some(index) => {
                self.notes[index].content = content.into();
                debug!("event=note_update module=store status=ok note_id={id}");
                true
            }
            None => {
                debug!("event=note_update module=store status=noop note_id={id}");
                false
            }
        };
        self.flush_best_effort(changed);
    }

    /// Current notes, newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn find_note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Notes grouped by category; empty categories are absent.
    pub fn notes_by_category(&self) -> BTreeMap<Category, Vec<Note>> {
        group_by_category(&self.notes)
    }

    /// Per-category counts for non-empty categories.
    pub fn category_summary(&self) -> Vec<CategorySummary> {
        summarize_by_category(&self.notes)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether the last write to storage failed.
    pub fn has_unflushed_changes(&self) -> bool {
        self.unflushed
    }

    /// Whether flushes are held back to protect unreadable persisted state.
    pub fn writes_blocked(&self) -> bool {
        self.writes_blocked
    }

    /// Allows flushes again; the next flush replaces the unreadable state.
    pub fn unblock_writes(&mut self) {
        if self.writes_blocked {
            info!("event=store_unblock module=store status=ok");
        }
        self.writes_blocked = false;
    }

    /// Writes the full collection to storage now.
    ///
    /// # Errors
    /// - `WritesBlocked` while `writes_blocked()` is set.
    /// - Otherwise the storage or encoding failure. Either way the store
    ///   stays marked as unflushed.
    pub fn flush(&mut self) -> PersistResult<()> {
        if self.writes_blocked {
            self.unflushed = true;
            return Err(PersistError::WritesBlocked);
        }
        let started_at = Instant::now();
        match save_notes(&self.storage, &self.key, &self.notes) {
            Ok(()) => {
                self.unflushed = false;
                debug!(
                    "event=store_flush module=store status=ok notes={} duration_ms={}",
                    self.notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                self.unflushed = true;
                Err(err)
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn flush_best_effort(&mut self, changed: bool) {
        if !changed && !self.unflushed {
            return;
        }
        if let Err(err) = self.flush() {
            warn!(
                "event=store_flush module=store status=error error_code=flush_failed notes={} error={}",
                self.notes.len(),
                err
            );
        }
    }
}

/// Returns `false` when the payload under `key` could not be copied aside.
fn backup_unreadable<S: StateStorage>(storage: &S, key: &str) -> bool {
    match preserve_unreadable(storage, key) {
        Ok(Some(backup_key)) => {
            warn!("event=store_backup module=store status=ok backup_key={backup_key}");
            true
        }
        Ok(None) => true,
        Err(err) => {
            error!(
                "event=store_backup module=store status=error error_code=backup_failed writes_blocked=true error={err}"
            );
            false
        }
    }
}

fn dedupe_by_id(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::with_capacity(notes.len());
    let total = notes.len();
    let unique: Vec<Note> = notes
        .into_iter()
        .filter(|note| seen.insert(note.id))
        .collect();
    if unique.len() != total {
        warn!(
            "event=store_hydrate module=store status=repaired dropped_duplicates={}",
            total - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::NoteStore;
    use crate::model::category::Category;
    use crate::model::note::Note;
    use crate::persist::encode_notes;
    use crate::persist::storage::{MemoryStateStorage, StateStorage};

    #[test]
    fn hydrate_keeps_first_of_duplicate_ids() {
        let first = Note::new(Category::Life, "kept", 2);
        let mut duplicate = Note::new(Category::WorkAndStudy, "dropped", 1);
        duplicate.id = first.id;
        let storage = MemoryStateStorage::new();
        storage
            .set_item("k", &encode_notes(&[first.clone(), duplicate]).unwrap())
            .unwrap();

        let store = NoteStore::hydrate(storage, "k");
        assert_eq!(store.notes(), &[first]);
    }

    #[test]
    fn add_note_uses_injected_clock() {
        let mut store = NoteStore::with_clock(MemoryStateStorage::new(), "k", || 1_234);
        let note = store.add_note(Category::HealthAndWellness, "walk");
        assert_eq!(note.created_at, 1_234);
        assert_eq!(store.find_note(note.id), Some(&note));
    }

    #[test]
    fn noop_mutations_do_not_write_when_clean() {
        let mut store = NoteStore::hydrate(MemoryStateStorage::new(), "k");
        store.delete_all_notes();
        store.delete_note(uuid::Uuid::new_v4());
        assert_eq!(store.storage().get_item("k").unwrap(), None);
    }
}
