//! The `ronbun search` command.

use std::path::PathBuf;

use anyhow::Result;

use ronbun_core::config::load_config_from;

pub fn execute(
    query: String,
    catalog_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = super::load_catalog(catalog_path, &config)?;

    let entries = catalog.search(&query);
    tracing::debug!(query = %query, matches = entries.len(), "searched catalog");

    if entries.is_empty() {
        println!("No AO departments match '{query}'.");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{} / {} / {}  ({} {} {}, {} past prompts)",
            entry.university.name,
            entry.faculty.name,
            entry.department.name,
            entry.university.id,
            entry.faculty.id,
            entry.department.id,
            entry.department.past_prompts.len()
        );
    }
    println!("\n{} department(s) found.", entries.len());

    Ok(())
}
