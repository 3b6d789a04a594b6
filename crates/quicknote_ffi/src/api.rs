//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note store operations to Dart via FRB.
//! - Own the process-level note store handle for the UI.
//! - Run input checks before anything reaches the store.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Ids and categories cross the boundary as stable strings.
//! - Missing ids are reported in `message`, never as failures.

use log::warn;
use quicknote_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    open_note_store, ping as ping_inner, validate_note_content, Category, CategorySummary, Note,
    NoteId, NoteStore, SqliteStateStorage, StoreConfig,
};
use std::path::PathBuf;
use std::sync::Mutex;

struct StoreHandle {
    db_path: PathBuf,
    store: NoteStore<SqliteStateStorage>,
}

static NOTE_STORE: Mutex<Option<StoreHandle>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive);
///   blank selects the build default (`debug` in debug builds, else `info`).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match level.trim() {
        "" => default_log_level(),
        explicit => explicit,
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One note as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    /// Stable note id in string form.
    pub id: String,
    /// Stable category identifier (`WorkAndStudy|Life|HealthAndWellness`).
    pub category: String,
    pub content: String,
    /// Creation time in Unix epoch milliseconds.
    pub created_at_ms: i64,
}

/// Result envelope for store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Affected note id, when one exists.
    pub note_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: Option<String>) -> Self {
        Self {
            ok: true,
            note_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Newest-first note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    pub message: String,
}

/// Notes of one category, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category: String,
    /// Translation key for the category label.
    pub label_key: String,
    pub items: Vec<NoteItem>,
}

/// Grouped notes; categories without notes are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroupsResponse {
    pub ok: bool,
    pub groups: Vec<CategoryGroup>,
    pub message: String,
}

/// Note count of one category for the summary screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub label_key: String,
    pub count: u32,
}

/// Summary counts; categories without notes are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummaryResponse {
    pub ok: bool,
    pub items: Vec<CategoryCount>,
    pub message: String,
}

/// Opens the note store and hydrates it from disk.
///
/// `db_path` overrides `QUICKNOTE_DB_PATH`; `None` or blank uses the
/// environment/default path. `:memory:` opens a store that is not persisted
/// past the process.
///
/// # FFI contract
/// - Idempotent for the same path.
/// - Opening a second, different path is rejected while a store is open.
/// - Other note calls open the default store lazily when this was skipped.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_init(db_path: Option<String>) -> NoteActionResponse {
    let config = resolve_config(db_path);
    let mut guard = match NOTE_STORE.lock() {
        Ok(guard) => guard,
        Err(_) => return NoteActionResponse::failure("notes_init failed: note store lock poisoned"),
    };

    if let Some(handle) = guard.as_ref() {
        if handle.db_path == config.db_path {
            return NoteActionResponse::success("Note store ready.", None);
        }
        return NoteActionResponse::failure(format!(
            "notes_init failed: note store already open at `{}`",
            handle.db_path.display()
        ));
    }

    match open_handle(config) {
        Ok(handle) => {
            *guard = Some(handle);
            NoteActionResponse::success("Note store ready.", None)
        }
        Err(err) => NoteActionResponse::failure(format!("notes_init failed: {err}")),
    }
}

/// Creates a note after checking category and content.
///
/// # FFI contract
/// - Rejects unknown categories, blank content and content over 200 chars.
/// - Returns created note id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn note_add(category: String, content: String) -> NoteActionResponse {
    let category = match Category::from_id(category.trim()) {
        Ok(category) => category,
        Err(err) => return NoteActionResponse::failure(format!("note_add failed: {err}")),
    };
    if let Err(err) = validate_note_content(&content) {
        return NoteActionResponse::failure(format!("note_add failed: {err}"));
    }

    match with_store(|store| store.add_note(category, content)) {
        Ok(note) => NoteActionResponse::success("Note created.", Some(note.id.to_string())),
        Err(err) => NoteActionResponse::failure(format!("note_add failed: {err}")),
    }
}

/// Replaces the content of one note.
///
/// # FFI contract
/// - Rejects blank content and content over 200 chars.
/// - Unknown or malformed ids succeed with a "No matching note." message.
#[flutter_rust_bridge::frb(sync)]
pub fn note_update(note_id: String, content: String) -> NoteActionResponse {
    if let Err(err) = validate_note_content(&content) {
        return NoteActionResponse::failure(format!("note_update failed: {err}"));
    }
    let Some(id) = parse_note_id(&note_id) else {
        return NoteActionResponse::success("No matching note.", None);
    };

    let result = with_store(|store| {
        let found = store.find_note(id).is_some();
        store.update_note(id, content);
        found
    });
    match result {
        Ok(true) => NoteActionResponse::success("Note updated.", Some(id.to_string())),
        Ok(false) => NoteActionResponse::success("No matching note.", None),
        Err(err) => NoteActionResponse::failure(format!("note_update failed: {err}")),
    }
}

/// Deletes one note.
///
/// # FFI contract
/// - Unknown or malformed ids succeed with a "No matching note." message.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NoteActionResponse {
    let Some(id) = parse_note_id(&note_id) else {
        return NoteActionResponse::success("No matching note.", None);
    };

    let result = with_store(|store| {
        let found = store.find_note(id).is_some();
        store.delete_note(id);
        found
    });
    match result {
        Ok(true) => NoteActionResponse::success("Note deleted.", Some(id.to_string())),
        Ok(false) => NoteActionResponse::success("No matching note.", None),
        Err(err) => NoteActionResponse::failure(format!("note_delete failed: {err}")),
    }
}

/// Deletes every note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete_all() -> NoteActionResponse {
    match with_store(|store| {
        let removed = store.len();
        store.delete_all_notes();
        removed
    }) {
        Ok(removed) => NoteActionResponse::success(format!("Deleted {removed} note(s)."), None),
        Err(err) => NoteActionResponse::failure(format!("notes_delete_all failed: {err}")),
    }
}

/// Lists all notes, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NotesListResponse {
    match with_store(|store| store.notes().iter().map(to_note_item).collect::<Vec<_>>()) {
        Ok(items) => NotesListResponse {
            ok: true,
            message: format!("{} note(s).", items.len()),
            items,
        },
        Err(err) => NotesListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("notes_list failed: {err}"),
        },
    }
}

/// Gets one note for the edit screen. `None` for unknown ids.
#[flutter_rust_bridge::frb(sync)]
pub fn note_get(note_id: String) -> Option<NoteItem> {
    let id = parse_note_id(&note_id)?;
    match with_store(|store| store.find_note(id).map(to_note_item)) {
        Ok(item) => item,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=note_get error={err}");
            None
        }
    }
}

/// Lists notes grouped by category in category order.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_by_category() -> CategoryGroupsResponse {
    let result = with_store(|store| {
        store
            .notes_by_category()
            .into_iter()
            .map(|(category, notes)| CategoryGroup {
                category: category.as_id().to_string(),
                label_key: category.translation_key().to_string(),
                items: notes.iter().map(to_note_item).collect(),
            })
            .collect::<Vec<_>>()
    });
    match result {
        Ok(groups) => CategoryGroupsResponse {
            ok: true,
            message: format!("{} categories.", groups.len()),
            groups,
        },
        Err(err) => CategoryGroupsResponse {
            ok: false,
            groups: Vec::new(),
            message: format!("notes_by_category failed: {err}"),
        },
    }
}

/// Returns per-category note counts for the summary screen.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_summary() -> CategorySummaryResponse {
    match with_store(|store| {
        store
            .category_summary()
            .into_iter()
            .map(to_category_count)
            .collect::<Vec<_>>()
    }) {
        Ok(items) => CategorySummaryResponse {
            ok: true,
            message: format!("{} categories.", items.len()),
            items,
        },
        Err(err) => CategorySummaryResponse {
            ok: false,
            items: Vec::new(),
            message: format!("notes_summary failed: {err}"),
        },
    }
}

fn resolve_config(db_path: Option<String>) -> StoreConfig {
    db_path
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(StoreConfig::at)
        .unwrap_or_else(StoreConfig::from_env)
}

fn open_handle(config: StoreConfig) -> Result<StoreHandle, String> {
    let store = open_note_store(&config).map_err(|err| format!("note store open failed: {err}"))?;
    Ok(StoreHandle {
        db_path: config.db_path,
        store,
    })
}

fn with_store<T>(f: impl FnOnce(&mut NoteStore<SqliteStateStorage>) -> T) -> Result<T, String> {
    let mut guard = NOTE_STORE
        .lock()
        .map_err(|_| "note store lock poisoned".to_string())?;
    if guard.is_none() {
        *guard = Some(open_handle(StoreConfig::from_env())?);
    }
    let handle = guard
        .as_mut()
        .ok_or_else(|| "note store unavailable".to_string())?;
    Ok(f(&mut handle.store))
}

fn parse_note_id(value: &str) -> Option<NoteId> {
    NoteId::parse_str(value.trim()).ok()
}

fn to_note_item(note: &Note) -> NoteItem {
    NoteItem {
        id: note.id.to_string(),
        category: note.category.as_id().to_string(),
        content: note.content.clone(),
        created_at_ms: note.created_at,
    }
}

fn to_category_count(summary: CategorySummary) -> CategoryCount {
    CategoryCount {
        category: summary.category.as_id().to_string(),
        label_key: summary.category.translation_key().to_string(),
        count: u32::try_from(summary.count).unwrap_or(u32::MAX),
    }
}
