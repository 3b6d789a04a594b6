//! Category label lookup boundary.
//!
//! The core never renders display strings for the UI; it exposes stable
//! translation keys and a trait the host's localization layer implements.
//! `EnglishLabels` is the fallback used by the CLI and by hosts without a
//! translation table.

use crate::model::category::Category;

/// Resolves a human-readable label for a category.
pub trait CategoryLabels {
    fn label(&self, category: Category) -> String;
}

impl Category {
    /// Key into the host's translation tables.
    pub fn translation_key(self) -> &'static str {
        match self {
            Self::WorkAndStudy => "category.work_and_study",
            Self::Life => "category.life",
            Self::HealthAndWellness => "category.health_and_wellness",
        }
    }
}

/// Built-in English labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLabels;

impl CategoryLabels for EnglishLabels {
    fn label(&self, category: Category) -> String {
        match category {
            Category::WorkAndStudy => "Work and Study",
            Category::Life => "Life",
            Category::HealthAndWellness => "Health and Wellness",
        }
        .to_string()
    }
}
