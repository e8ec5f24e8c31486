use crate::state::ItemKind;

/// Static lookup of per-kind display data and economy values.
pub trait ItemCatalog: Send + Sync {
    /// Never fails: the kind set is closed and every kind has a definition.
    fn lookup(&self, kind: ItemKind) -> ItemDefinition;

    /// Gold paid for selling an item: `base_value * 2^(level - 1)`.
    fn sell_value(&self, kind: ItemKind, level: u8) -> u64 {
        sell_value(self.lookup(kind).base_value, level)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub kind: ItemKind,
    pub display_name: String,
    pub base_value: u64,
}

impl ItemDefinition {
    pub fn new(kind: ItemKind, display_name: impl Into<String>, base_value: u64) -> Self {
        Self {
            kind,
            display_name: display_name.into(),
            base_value,
        }
    }
}

/// Exponential rarity scaling. Levels below 1 are treated as 1.
pub fn sell_value(base_value: u64, level: u8) -> u64 {
    let exponent = u32::from(level.max(1) - 1);
    base_value.saturating_mul(1u64 << exponent.min(63))
}
