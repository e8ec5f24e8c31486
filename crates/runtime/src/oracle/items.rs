//! [`merge_core::ItemCatalog`] backed by an in-memory map.
use std::collections::HashMap;

use merge_core::{ItemCatalog, ItemDefinition, ItemKind};
use strum::IntoEnumIterator;

use crate::api::RuntimeError;

/// ItemCatalog implementation with static item definitions.
///
/// Construction checks that every [`ItemKind`] is covered, so `lookup` never
/// has to invent data.
#[derive(Debug, Clone)]
pub struct ItemCatalogImpl {
    definitions: HashMap<ItemKind, ItemDefinition>,
}

impl ItemCatalogImpl {
    pub fn new(definitions: impl IntoIterator<Item = ItemDefinition>) -> Result<Self, RuntimeError> {
        let definitions: HashMap<_, _> = definitions
            .into_iter()
            .map(|definition| (definition.kind, definition))
            .collect();

        if let Some(missing) = ItemKind::iter().find(|kind| !definitions.contains_key(kind)) {
            return Err(RuntimeError::IncompleteCatalog(missing));
        }

        Ok(Self { definitions })
    }

    /// Catalog built from the bundled content.
    pub fn builtin() -> Self {
        let definitions = merge_content::item_definitions()
            .into_iter()
            .map(|definition| (definition.kind, definition))
            .collect();
        Self { definitions }
    }
}

impl ItemCatalog for ItemCatalogImpl {
    fn lookup(&self, kind: ItemKind) -> ItemDefinition {
        self.definitions
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| ItemDefinition::new(kind, kind.as_ref(), 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_prices_potions_highest() {
        let catalog = ItemCatalogImpl::builtin();
        assert_eq!(catalog.lookup(ItemKind::Crop).display_name, "Wheat");
        assert_eq!(catalog.sell_value(ItemKind::Potion, 3), 60);
    }

    #[test]
    fn missing_kind_is_rejected() {
        let err = ItemCatalogImpl::new([ItemDefinition::new(ItemKind::Wood, "Wood", 5)])
            .unwrap_err();
        assert!(matches!(err, RuntimeError::IncompleteCatalog(ItemKind::Stone)));
    }
}
