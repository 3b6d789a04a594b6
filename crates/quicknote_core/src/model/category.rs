//! Note category model.
//!
//! # Responsibility
//! - Define the closed set of note categories and their stable identifiers.
//!
//! # Invariants
//! - Identifiers are stable across releases; they are persisted verbatim.
//! - Ordering follows declaration order and drives grouped view order.

use crate::model::note::NoteInputError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Topic tag attached to every note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    WorkAndStudy,
    Life,
    HealthAndWellness,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 3] = [
        Category::WorkAndStudy,
        Category::Life,
        Category::HealthAndWellness,
    ];

    /// Returns the stable identifier. Never a display string.
    pub fn as_id(self) -> &'static str {
        match self {
            Self::WorkAndStudy => "WorkAndStudy",
            Self::Life => "Life",
            Self::HealthAndWellness => "HealthAndWellness",
        }
    }

    /// Parses a stable identifier.
    ///
    /// # Errors
    /// - Returns `NoteInputError::UnknownCategory` for any other value,
    ///   including display labels such as `"Work and Study"`.
    pub fn from_id(value: &str) -> Result<Self, NoteInputError> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_id() == value)
            .ok_or_else(|| NoteInputError::UnknownCategory(value.to_string()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_id())
    }
}
