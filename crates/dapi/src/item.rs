//! Inventory item view.
//!
//! Raw item objects (from an inventory response or an item definition in the
//! manifest) carry dozens of fields. `InventoryItem` exposes a fixed set of
//! them under stable snake_case names.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use strum::EnumString;

use crate::manifest::ManifestTable;

/// Fields readable through [`InventoryItem::get`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ItemField {
    Name,
    IsEquippable,
    ClassType,
    Description,
    ItemType,
    TierType,
}

impl ItemField {
    /// Key of this field in the raw API object
    pub fn api_key(&self) -> &'static str {
        match self {
            Self::Name => "itemName",
            Self::IsEquippable => "equippable",
            Self::ClassType => "classType",
            Self::Description => "itemDescription",
            Self::ItemType => "itemTypeName",
            Self::TierType => "tierTypeName",
        }
    }
}

/// An item identified by its unsigned hash
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    item_hash: u32,
    api_object: Value,
}

impl InventoryItem {
    pub fn new(item_hash: u32, api_object: Value) -> Self {
        Self {
            item_hash,
            api_object,
        }
    }

    /// Build an item from a raw object carrying its own `itemHash`
    pub fn from_raw(api_object: Value) -> Option<Self> {
        let item_hash = api_object
            .get("itemHash")
            .and_then(Value::as_u64)
            .and_then(|h| u32::try_from(h).ok())?;
        Some(Self::new(item_hash, api_object))
    }

    /// Resolve an item definition from a loaded item definition table
    pub fn from_manifest(table: &ManifestTable, item_hash: u32) -> Option<Self> {
        table
            .get(&item_hash)
            .map(|definition| Self::new(item_hash, definition.clone()))
    }

    pub fn item_hash(&self) -> u32 {
        self.item_hash
    }

    pub fn api_object(&self) -> &Value {
        &self.api_object
    }

    /// Read a whitelisted field
    pub fn field(&self, field: ItemField) -> Option<&Value> {
        self.api_object.get(field.api_key())
    }

    /// Read a whitelisted field by name. Unknown names yield `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        ItemField::from_str(name)
            .ok()
            .and_then(|field| self.field(field))
    }

    fn field_str(&self, field: ItemField) -> Option<&str> {
        self.field(field).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.field_str(ItemField::Name)
    }

    pub fn description(&self) -> Option<&str> {
        self.field_str(ItemField::Description)
    }

    pub fn item_type(&self) -> Option<&str> {
        self.field_str(ItemField::ItemType)
    }

    pub fn tier_type(&self) -> Option<&str> {
        self.field_str(ItemField::TierType)
    }

    pub fn is_equippable(&self) -> bool {
        self.field(ItemField::IsEquippable)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl fmt::Display for InventoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!(
            "{} ({})",
            self.name().unwrap_or("None"),
            self.description().unwrap_or("N/A")
        );
        // Item text is full of typographic quotes; keep terminal output plain ASCII
        let ascii: String = text.chars().filter(char::is_ascii).collect();
        f.write_str(&ascii)
    }
}

/// Item hashes listed in an inventory summary (`items[*].itemHash`)
pub fn inventory_item_hashes(inventory: &Value) -> Vec<u32> {
    inventory
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("itemHash").and_then(Value::as_u64))
                .filter_map(|h| u32::try_from(h).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item() -> InventoryItem {
        InventoryItem::new(
            1_274_330_687,
            json!({
                "itemHash": 1_274_330_687u32,
                "itemName": "Gjallarhorn",
                "itemDescription": "\u{201c}If there is beauty in destruction, why not also in its delivery?\u{201d}",
                "itemTypeName": "Rocket Launcher",
                "tierTypeName": "Exotic",
                "classType": 3,
                "equippable": true,
                "bucketTypeHash": 953_998_645u32
            }),
        )
    }

    #[test]
    fn test_get_whitelisted_fields() {
        let item = sample_item();
        assert_eq!(item.get("name"), Some(&json!("Gjallarhorn")));
        assert_eq!(item.get("item_type"), Some(&json!("Rocket Launcher")));
        assert_eq!(item.get("tier_type"), Some(&json!("Exotic")));
        assert_eq!(item.get("class_type"), Some(&json!(3)));
        assert!(item.is_equippable());
    }

    #[test]
    fn test_get_unknown_field_is_none() {
        let item = sample_item();
        // Present in the raw object but not whitelisted
        assert_eq!(item.get("bucketTypeHash"), None);
        assert_eq!(item.get("itemName"), None);
        assert_eq!(item.get("anything"), None);
    }

    #[test]
    fn test_missing_whitelisted_field_is_none() {
        let item = InventoryItem::new(1, json!({}));
        assert_eq!(item.name(), None);
        assert!(!item.is_equippable());
        assert_eq!(item.to_string(), "None (N/A)");
    }

    #[test]
    fn test_display_strips_non_ascii() {
        let item = sample_item();
        assert_eq!(
            item.to_string(),
            "Gjallarhorn (If there is beauty in destruction, why not also in its delivery?)"
        );
    }

    #[test]
    fn test_items_do_not_share_state() {
        let a = InventoryItem::new(1, json!({"itemName": "A"}));
        let b = InventoryItem::new(2, json!({}));
        assert_eq!(a.name(), Some("A"));
        assert_eq!(b.name(), None);
    }

    #[test]
    fn test_from_raw_and_manifest() {
        let item = InventoryItem::from_raw(json!({"itemHash": 42, "itemName": "X"})).unwrap();
        assert_eq!(item.item_hash(), 42);
        assert!(InventoryItem::from_raw(json!({"itemName": "X"})).is_none());

        let mut table = ManifestTable::new();
        table.insert(4_294_967_295, json!({"itemName": "Edge"}));
        let item = InventoryItem::from_manifest(&table, 4_294_967_295).unwrap();
        assert_eq!(item.name(), Some("Edge"));
        assert!(InventoryItem::from_manifest(&table, 7).is_none());
    }

    #[test]
    fn test_inventory_item_hashes() {
        let inventory = json!({
            "items": [
                {"itemHash": 1, "itemId": "0"},
                {"itemId": "1"},
                {"itemHash": 4_294_967_295u32}
            ]
        });
        assert_eq!(inventory_item_hashes(&inventory), vec![1, 4_294_967_295]);
        assert!(inventory_item_hashes(&json!({})).is_empty());
    }
}
