use core::fmt;

use crate::config::GameConfig;

/// Unique identifier for an item instance on the grid.
///
/// Ids are allocated by [`GameState::allocate_item_id`](super::GameState::allocate_item_id)
/// and never reused within a session, so they are the correlation key for
/// anything that completes after the grid may have changed (lore enrichment,
/// acknowledgements of creation effects).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of mergeable resources.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    Wood,
    Stone,
    Crop,
    Potion,
}

/// How an item came into existence. Only used by presentation to pick an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CreationCause {
    Spawn,
    Merge,
}

/// A single item instance held by a grid slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    level: u8,
    /// Flavor text, filled in asynchronously for rare items.
    pub lore: Option<String>,
    /// Set on creation, cleared once the creation effect has played.
    pub is_new: bool,
    pub cause: CreationCause,
}

impl Item {
    /// Creates a freshly spawned item. Returns `None` when `level` is outside
    /// `1..=GameConfig::MAX_ITEM_LEVEL`.
    pub fn spawned(id: ItemId, kind: ItemKind, level: u8) -> Option<Self> {
        Self::is_valid_level(level).then(|| Self {
            id,
            kind,
            level,
            lore: None,
            is_new: true,
            cause: CreationCause::Spawn,
        })
    }

    /// Creates the product of merging an item into `self`, the merge target.
    /// The target's lore carries over until fresh lore arrives.
    ///
    /// Returns `None` if `self` is already at the level cap.
    pub fn merged(&self, id: ItemId) -> Option<Self> {
        if !self.can_level_up() {
            return None;
        }
        Some(Self {
            id,
            kind: self.kind,
            level: self.level + 1,
            lore: self.lore.clone(),
            is_new: true,
            cause: CreationCause::Merge,
        })
    }

    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[inline]
    pub fn can_level_up(&self) -> bool {
        self.level < GameConfig::MAX_ITEM_LEVEL
    }

    /// True when `other` can be merged into `self`: same kind, same level, below the cap.
    pub fn merges_with(&self, other: &Item) -> bool {
        self.kind == other.kind && self.level == other.level && self.can_level_up()
    }

    /// True when this item satisfies a `(kind, min_level)` requirement.
    pub fn satisfies(&self, kind: ItemKind, min_level: u8) -> bool {
        self.kind == kind && self.level >= min_level
    }

    pub const fn is_valid_level(level: u8) -> bool {
        level >= 1 && level <= GameConfig::MAX_ITEM_LEVEL
    }
}
