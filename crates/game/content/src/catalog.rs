//! Built-in item catalog.

use merge_core::{ItemDefinition, ItemKind};

/// Display names and sell base values for every item kind.
pub fn item_definitions() -> Vec<ItemDefinition> {
    vec![
        ItemDefinition::new(ItemKind::Wood, "Wood", 5),
        ItemDefinition::new(ItemKind::Stone, "Stone", 8),
        ItemDefinition::new(ItemKind::Crop, "Wheat", 3),
        ItemDefinition::new(ItemKind::Potion, "Elixir", 15),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_kind_is_defined_once() {
        let definitions = item_definitions();
        for kind in ItemKind::iter() {
            assert_eq!(definitions.iter().filter(|d| d.kind == kind).count(), 1);
        }
    }
}
