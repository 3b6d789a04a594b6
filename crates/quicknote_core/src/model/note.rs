//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record owned by the note store.
//! - Provide input checks the presentation boundary runs before submitting.
//!
//! # Invariants
//! - `id`, `category` and `created_at` never change after creation.
//! - `created_at` is Unix epoch milliseconds.
//! - The store itself never validates `content`.

use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for one note.
pub type NoteId = Uuid;

/// Maximum note length accepted by the input layer, in characters.
pub const NOTE_CONTENT_MAX_CHARS: usize = 200;

/// One user-authored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Generated at creation, unique within the store.
    pub id: NoteId,
    /// Set at creation; no operation changes it.
    pub category: Category,
    /// Plain text body. Mutable through `NoteStore::update_note` only.
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Note {
    /// Creates a note with a generated id.
    pub fn new(category: Category, content: impl Into<String>, created_at: i64) -> Self {
        Self::with_id(Uuid::new_v4(), category, content, created_at)
    }

    /// Creates a note with a caller-provided id.
    ///
    /// Used by hydrate paths and tests where identity already exists.
    pub fn with_id(
        id: NoteId,
        category: Category,
        content: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            category,
            content: content.into(),
            created_at,
        }
    }
}

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteInputError {
    /// Category identifier is not one of `Category::ALL`.
    UnknownCategory(String),
    /// Content is empty or whitespace only.
    EmptyContent,
    /// Content exceeds `NOTE_CONTENT_MAX_CHARS`.
    ContentTooLong { max: usize, actual: usize },
}

impl Display for NoteInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCategory(value) => write!(f, "unknown category: `{value}`"),
            Self::EmptyContent => write!(f, "note content cannot be empty"),
            Self::ContentTooLong { max, actual } => {
                write!(f, "note content exceeds {max} characters (got {actual})")
            }
        }
    }
}

impl Error for NoteInputError {}

/// Checks content against the input layer's rules.
///
/// Length is counted in Unicode scalar values, not bytes.
///
/// # Errors
/// - `EmptyContent` when `content` is empty after trimming.
/// - `ContentTooLong` when `content` has more than 200 characters.
pub fn validate_note_content(content: &str) -> Result<(), NoteInputError> {
    if content.trim().is_empty() {
        return Err(NoteInputError::EmptyContent);
    }
    let actual = content.chars().count();
    if actual > NOTE_CONTENT_MAX_CHARS {
        return Err(NoteInputError::ContentTooLong {
            max: NOTE_CONTENT_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

/// Returns current wall-clock time in epoch milliseconds.
///
/// Clocks set before 1970 collapse to `0` instead of failing.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{validate_note_content, Category, Note, NoteInputError, NOTE_CONTENT_MAX_CHARS};

    #[test]
    fn validate_accepts_boundary_length() {
        let content = "a".repeat(NOTE_CONTENT_MAX_CHARS);
        assert!(validate_note_content(&content).is_ok());
    }

    #[test]
    fn validate_rejects_one_past_limit() {
        let content = "a".repeat(NOTE_CONTENT_MAX_CHARS + 1);
        assert_eq!(
            validate_note_content(&content),
            Err(NoteInputError::ContentTooLong {
                max: 200,
                actual: 201
            })
        );
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        let content = "笔".repeat(NOTE_CONTENT_MAX_CHARS);
        assert!(content.len() > NOTE_CONTENT_MAX_CHARS);
        assert!(validate_note_content(&content).is_ok());
    }

    #[test]
    fn validate_rejects_blank_content() {
        assert_eq!(validate_note_content(""), Err(NoteInputError::EmptyContent));
        assert_eq!(
            validate_note_content("  \n "),
            Err(NoteInputError::EmptyContent)
        );
    }

    #[test]
    fn note_serializes_created_at_as_camel_case_number() {
        let note = Note::new(Category::Life, "buy milk", 1_700_000_000_000);
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["createdAt"], 1_700_000_000_000_i64);
        assert_eq!(value["category"], "Life");
        assert_eq!(value["content"], "buy milk");
    }
}
