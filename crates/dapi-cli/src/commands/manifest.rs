//! World manifest commands.

use std::path::Path;

use anyhow::{Context, Result};
use dapi::{Dapi, list_tables, load_manifest};
use tracing::info;

pub fn fetch(api: &Dapi, language: &str, output: &Path) -> Result<()> {
    let manifest = api.fetch_world_manifest(language)?;
    let saved = manifest
        .persist(output)
        .with_context(|| format!("Failed to save manifest to {}", output.display()))?;
    info!(
        "Manifest version {}",
        manifest.version().unwrap_or("unknown")
    );
    println!("{}", saved.display());
    Ok(())
}

pub fn tables(db: &Path) -> Result<()> {
    for name in list_tables(db)? {
        println!("{}", name);
    }
    Ok(())
}

/// Print one definition, or every definition of `table` ordered by hash
pub fn show(db: &Path, table: &str, hash: Option<u32>) -> Result<()> {
    let definitions = load_manifest(db, table)?;

    if let Some(hash) = hash {
        let definition = definitions
            .get(&hash)
            .with_context(|| format!("No definition {} in {}", hash, table))?;
        println!("{}", serde_json::to_string_pretty(definition)?);
        return Ok(());
    }

    let mut hashes: Vec<u32> = definitions.keys().copied().collect();
    hashes.sort_unstable();
    for hash in hashes {
        println!("{}\t{}", hash, definitions[&hash]);
    }
    Ok(())
}
