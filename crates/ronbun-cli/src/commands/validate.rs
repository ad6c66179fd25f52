//! The `ronbun validate` command.

use std::path::PathBuf;

use anyhow::Result;

use ronbun_core::parser::{self, ValidationWarning};

pub fn execute(catalog_path: Option<PathBuf>, essays_path: Option<PathBuf>) -> Result<()> {
    let mut total_warnings = 0;

    if let Some(path) = catalog_path {
        let catalogs = if path.is_dir() {
            parser::load_catalog_directory(&path)?
        } else {
            vec![parser::parse_catalog(&path)?]
        };

        for catalog in &catalogs {
            println!(
                "Catalog: {} ({} universities, {} past prompts)",
                catalog.name,
                catalog.universities.len(),
                catalog.past_prompts().count()
            );
            total_warnings += print_warnings(&parser::validate_catalog(catalog));
        }
    }

    if let Some(path) = essays_path {
        let sets = if path.is_dir() {
            parser::load_essay_directory(&path)?
        } else {
            vec![parser::parse_essay_set(&path)?]
        };

        for set in &sets {
            println!("Essay set: {} ({} essays)", set.name, set.essays.len());
            total_warnings += print_warnings(&parser::validate_essay_set(set));
        }
    }

    if total_warnings == 0 {
        println!("All files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn print_warnings(warnings: &[ValidationWarning]) -> usize {
    for w in warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
    warnings.len()
}
