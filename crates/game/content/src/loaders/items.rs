//! Item catalog loader.

use std::path::Path;

use merge_core::ItemDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalogFile {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        let catalog: ItemCatalogFile = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(catalog.items)
    }
}

#[cfg(test)]
mod tests {
    use merge_core::ItemKind;

    use super::*;
    use crate::loaders::test_support::write_temp;

    #[test]
    fn loads_definitions() {
        let file = write_temp(
            r#"(
    items: [
        (kind: wood, display_name: "Oak", base_value: 7),
        (kind: potion, display_name: "Tonic", base_value: 20),
    ],
)"#,
        );

        let items = ItemLoader::load(file.path()).expect("catalog loads");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], ItemDefinition::new(ItemKind::Wood, "Oak", 7));
        assert_eq!(items[1].kind, ItemKind::Potion);
    }

    #[test]
    fn unknown_kind_fails() {
        let file = write_temp(r#"(items: [(kind: iron, display_name: "Iron", base_value: 1)])"#);
        let err = ItemLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse item catalog RON"));
    }
}
