//! Domain model for categorized notes.
//!
//! # Responsibility
//! - Define canonical data structures used by the note store.
//! - Keep category identity separate from any display label.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - `Category` is a closed set; unknown identifiers are rejected at parse.

pub mod category;
pub mod note;
