//! Read-only derivations over the note collection.
//!
//! # Responsibility
//! - Group notes by category for list rendering.
//! - Count notes per category for the summary screen.
//!
//! # Invariants
//! - Derivations never mutate their input.
//! - Each note lands in exactly one group; intra-group order matches input.
//! - Categories with zero notes are absent from every derived view.

use crate::model::category::Category;
use crate::model::note::Note;
use std::collections::BTreeMap;

/// Per-category count shown on the summary screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
}

/// Groups notes by category, preserving input order inside each group.
///
/// Map iteration follows `Category` declaration order.
pub fn group_by_category(notes: &[Note]) -> BTreeMap<Category, Vec<Note>> {
    let mut groups: BTreeMap<Category, Vec<Note>> = BTreeMap::new();
    for note in notes {
        groups.entry(note.category).or_default().push(note.clone());
    }
    groups
}

/// Counts notes per category, skipping empty categories.
pub fn summarize_by_category(notes: &[Note]) -> Vec<CategorySummary> {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let count = notes.iter().filter(|note| note.category == category).count();
            (count > 0).then_some(CategorySummary { category, count })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{group_by_category, summarize_by_category, CategorySummary};
    use crate::model::category::Category;
    use crate::model::note::Note;

    fn sample() -> Vec<Note> {
        vec![
            Note::new(Category::Life, "c", 3),
            Note::new(Category::WorkAndStudy, "b", 2),
            Note::new(Category::Life, "a", 1),
        ]
    }

    #[test]
    fn group_preserves_relative_order_and_omits_empty_categories() {
        let notes = sample();
        let groups = group_by_category(&notes);

        assert_eq!(groups.len(), 2);
        assert!(!groups.contains_key(&Category::HealthAndWellness));
        let life: Vec<&str> = groups[&Category::Life]
            .iter()
            .map(|note| note.content.as_str())
            .collect();
        assert_eq!(life, vec!["c", "a"]);
    }

    #[test]
    fn group_of_empty_input_is_empty() {
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn summary_counts_in_category_order() {
        let summary = summarize_by_category(&sample());
        assert_eq!(
            summary,
            vec![
                CategorySummary {
                    category: Category::WorkAndStudy,
                    count: 1
                },
                CategorySummary {
                    category: Category::Life,
                    count: 2
                },
            ]
        );
    }
}
