//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quicknote_core` linkage.
//! - Open the configured store and print per-category counts.

use quicknote_core::{open_note_store, CategoryLabels, EnglishLabels, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("quicknote_core ping={}", quicknote_core::ping());
    println!("quicknote_core version={}", quicknote_core::core_version());

    let config = StoreConfig::from_env();
    let store = match open_note_store(&config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!(
                "quicknote_core store={} error={err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    println!(
        "quicknote_core store={} notes={}",
        config.db_path.display(),
        store.len()
    );
    for summary in store.category_summary() {
        println!(
            "  {} ({}): {}",
            EnglishLabels.label(summary.category),
            summary.category,
            summary.count
        );
    }
    ExitCode::SUCCESS
}
