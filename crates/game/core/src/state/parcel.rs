use super::item::ItemKind;

/// One entry of a parcel's cost: an item of `kind` at `min_level` or above.
///
/// `count` is the quantity shown on the map; restoration claims one slot per
/// entry regardless.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRequirement {
    pub kind: ItemKind,
    pub min_level: u8,
    #[cfg_attr(feature = "serde", serde(default = "default_count"))]
    pub count: u8,
}

#[cfg(feature = "serde")]
fn default_count() -> u8 {
    1
}

impl ItemRequirement {
    pub const fn new(kind: ItemKind, min_level: u8, count: u8) -> Self {
        Self {
            kind,
            min_level,
            count,
        }
    }

    pub const fn single(kind: ItemKind, min_level: u8) -> Self {
        Self::new(kind, min_level, 1)
    }
}

/// A restorable map location.
///
/// `unlocked` only ever goes from `false` to `true`; once set the parcel's
/// income is part of every subsequent income cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parcel {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unlocked: bool,
    pub cost_gold: u64,
    pub requirements: Vec<ItemRequirement>,
    pub income_per_cycle: u64,
}

/// Sum of income over unlocked parcels.
pub fn unlocked_income(parcels: &[Parcel]) -> u64 {
    parcels
        .iter()
        .filter(|parcel| parcel.unlocked)
        .map(|parcel| parcel.income_per_cycle)
        .sum()
}
