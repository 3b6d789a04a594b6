//! Application state container for notes.
//!
//! # Responsibility
//! - Hold the session's note collection and keep persisted state in step.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod note_store;
