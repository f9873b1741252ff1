//! Item catalog loader.

use std::path::Path;

use arena_core::{EquipmentSlot, Item};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<Item>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load_embedded() -> LoadResult<Vec<Item>> {
        Self::from_ron_str(include_str!("../../data/items.ron"))
    }

    /// Load item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<Item>> {
        let content = read_file(path)?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> LoadResult<Vec<Item>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(catalog.items)
    }

    /// Find an item by name (case-insensitive) in a loaded catalog.
    pub fn find<'a>(items: &'a [Item], name: &str) -> Option<&'a Item> {
        items.iter().find(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Items that fit `slot`.
    pub fn for_slot(items: &[Item], slot: EquipmentSlot) -> impl Iterator<Item = &Item> {
        items.iter().filter(move |item| item.slot == slot)
    }
}
