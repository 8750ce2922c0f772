//! Inventory command.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use dapi::{
    Dapi, ITEM_DEFINITION_TABLE, InventoryItem, ManifestTable, inventory_item_hashes,
    load_manifest,
};
use serde_json::Value;
use tracing::info;

fn item_line(hash: u32, definitions: Option<&ManifestTable>) -> String {
    match definitions {
        Some(table) => match InventoryItem::from_manifest(table, hash) {
            Some(item) => item.to_string(),
            None => format!("{} (not in manifest)", hash),
        },
        None => hash.to_string(),
    }
}

/// Lines describing one inventory per character
fn render(
    inventories: &BTreeMap<String, Option<Value>>,
    definitions: Option<&ManifestTable>,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (character_id, inventory) in inventories {
        lines.push(format!("Character {}:", character_id));
        let hashes = inventory
            .as_ref()
            .map(inventory_item_hashes)
            .unwrap_or_default();
        if hashes.is_empty() {
            lines.push("  (empty)".to_string());
        }
        for hash in hashes {
            lines.push(format!("  {}", item_line(hash, definitions)));
        }
    }
    lines
}

pub fn run(
    api: &Dapi,
    character_id: Option<&str>,
    membership_id: Option<&str>,
    manifest: Option<&Path>,
) -> Result<()> {
    let definitions = manifest
        .map(|path| {
            load_manifest(path, ITEM_DEFINITION_TABLE)
                .with_context(|| format!("Failed to load item definitions from {}", path.display()))
        })
        .transpose()?;
    if let Some(table) = &definitions {
        info!("Loaded {} item definitions", table.len());
    }

    let inventories = match character_id {
        Some(id) => BTreeMap::from([(id.to_string(), api.inventory(id, membership_id)?)]),
        None => api.full_inventory(membership_id)?,
    };

    for line in render(&inventories, definitions.as_ref()) {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_with_definitions() {
        let mut table = ManifestTable::new();
        table.insert(
            1_274_330_687,
            json!({"itemName": "Gjallarhorn", "itemDescription": "Wolfpack rounds"}),
        );

        let inventories = BTreeMap::from([
            (
                "11".to_string(),
                Some(json!({"items": [{"itemHash": 1_274_330_687u32}, {"itemHash": 5}]})),
            ),
            ("22".to_string(), None),
        ]);

        let lines = render(&inventories, Some(&table));
        assert_eq!(
            lines,
            vec![
                "Character 11:",
                "  Gjallarhorn (Wolfpack rounds)",
                "  5 (not in manifest)",
                "Character 22:",
                "  (empty)",
            ]
        );
    }

    #[test]
    fn test_render_hashes_only() {
        let inventories = BTreeMap::from([(
            "11".to_string(),
            Some(json!({"items": [{"itemHash": 42}]})),
        )]);
        assert_eq!(render(&inventories, None), vec!["Character 11:", "  42"]);
    }
}
