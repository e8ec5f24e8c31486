//! Merge grid actions: spawn, combine (move / merge / swap), sell, and the
//! two item-annotation actions driven by presentation and enrichment.

use crate::config::GameConfig;
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::events::{Effect, EffectKind};
use crate::state::{GameState, Item, ItemId, ItemKind, SlotIndex};

use super::{ActionTransition, ApplyContext, LoreRequest};

/// Rejections produced by grid actions. A rejected action mutates nothing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    #[error("slot {index} is out of range (grid has {len} slots)")]
    SlotOutOfRange { index: SlotIndex, len: usize },

    #[error("no empty slot available")]
    GridFull,

    #[error("slot {0} is empty")]
    EmptySlot(SlotIndex),

    #[error("source and target are the same slot ({0})")]
    SameSlot(SlotIndex),

    #[error("item level {0} is outside 1..={max}", max = GameConfig::MAX_ITEM_LEVEL)]
    InvalidLevel(u8),

    #[error("item {0} is no longer on the grid")]
    ItemNotFound(ItemId),
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::GridFull | Self::ItemNotFound(_) => ErrorSeverity::Recoverable,
            Self::SlotOutOfRange { .. }
            | Self::EmptySlot(_)
            | Self::SameSlot(_)
            | Self::InvalidLevel(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SlotOutOfRange { .. } => "GRID_SLOT_OUT_OF_RANGE",
            Self::GridFull => "GRID_FULL",
            Self::EmptySlot(_) => "GRID_EMPTY_SLOT",
            Self::SameSlot(_) => "GRID_SAME_SLOT",
            Self::InvalidLevel(_) => "GRID_INVALID_LEVEL",
            Self::ItemNotFound(_) => "GRID_ITEM_NOT_FOUND",
        }
    }
}

fn check_index(state: &GameState, index: SlotIndex) -> Result<(), GridError> {
    if state.grid.contains_index(index) {
        Ok(())
    } else {
        Err(GridError::SlotOutOfRange {
            index,
            len: state.grid.len(),
        })
    }
}

fn occupied(state: &GameState, index: SlotIndex) -> Result<&Item, GridError> {
    check_index(state, index)?;
    state.grid.get(index).ok_or(GridError::EmptySlot(index))
}

// ============================================================================
// Spawn
// ============================================================================

/// Places a new item in the first empty slot (index order).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnAction {
    pub kind: ItemKind,
    pub level: u8,
}

impl SpawnAction {
    pub fn new(kind: ItemKind, level: u8) -> Self {
        Self { kind, level }
    }
}

impl ActionTransition for SpawnAction {
    type Error = GridError;
    type Result = (SlotIndex, ItemId);

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if !Item::is_valid_level(self.level) {
            return Err(GridError::InvalidLevel(self.level));
        }
        state.grid.first_empty().map(|_| ()).ok_or(GridError::GridFull)
    }

    fn apply(
        &self,
        state: &mut GameState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let slot = state.grid.first_empty().ok_or(GridError::GridFull)?;
        let id = state.allocate_item_id();
        let item = Item::spawned(id, self.kind, self.level).ok_or(GridError::InvalidLevel(self.level))?;
        state.grid.replace(slot, Some(item));
        Ok((slot, id))
    }
}

// ============================================================================
// Combine
// ============================================================================

/// What a combine request resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombineOutcome {
    Moved {
        from: SlotIndex,
        to: SlotIndex,
    },
    Merged {
        slot: SlotIndex,
        item: ItemId,
        level: u8,
        /// Present when the new item is rare enough to deserve lore.
        lore: Option<LoreRequest>,
    },
    Swapped {
        from: SlotIndex,
        to: SlotIndex,
    },
}

/// Drag/tap of the item in `from` onto `to`.
///
/// Dispatch, evaluated in order: empty target moves, matching kind and level
/// below the cap merges, anything else swaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombineAction {
    pub from: SlotIndex,
    pub to: SlotIndex,
}

impl CombineAction {
    pub fn new(from: SlotIndex, to: SlotIndex) -> Self {
        Self { from, to }
    }
}

impl ActionTransition for CombineAction {
    type Error = GridError;
    type Result = CombineOutcome;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        check_index(state, self.to)?;
        occupied(state, self.from)?;
        if self.from == self.to {
            return Err(GridError::SameSlot(self.from));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let (from, to) = (self.from, self.to);
        let source = occupied(state, from)?;
        let merges = state.grid.get(to).map(|target| source.merges_with(target));

        match merges {
            None => {
                let item = state.grid.take(from);
                state.grid.replace(to, item);
                return Ok(CombineOutcome::Moved { from, to });
            }
            Some(false) => {
                state.grid.swap(from, to);
                return Ok(CombineOutcome::Swapped { from, to });
            }
            Some(true) => {}
        }

        let id = state.allocate_item_id();
        let merged = occupied(state, to)?
            .merged(id)
            .ok_or(GridError::InvalidLevel(GameConfig::MAX_ITEM_LEVEL))?;
        let (kind, level) = (merged.kind, merged.level());

        state.grid.take(from);
        state.grid.replace(to, Some(merged));

        ctx.grant_xp(GameConfig::MERGE_XP_PER_LEVEL * u64::from(level));
        ctx.emit(Effect::merge_explosion(to));
        ctx.emit(Effect::new(EffectKind::ScreenShake));

        let lore = (level >= GameConfig::LORE_LEVEL_THRESHOLD).then_some(LoreRequest {
            item: id,
            kind,
            level,
        });
        Ok(CombineOutcome::Merged {
            slot: to,
            item: id,
            level,
            lore,
        })
    }
}

// ============================================================================
// Sell
// ============================================================================

/// Removes the item at `slot` for gold and a flat XP reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SellAction {
    pub slot: SlotIndex,
}

impl SellAction {
    pub fn new(slot: SlotIndex) -> Self {
        Self { slot }
    }
}

impl ActionTransition for SellAction {
    type Error = GridError;
    /// Gold credited.
    type Result = u64;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        occupied(state, self.slot).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let item = occupied(state, self.slot)?;
        let gold = ctx.env().catalog().sell_value(item.kind, item.level());

        state.grid.take(self.slot);
        state.player.gold = state.player.gold.saturating_add(gold);

        ctx.grant_xp(GameConfig::SELL_XP);
        ctx.emit(Effect::gold_popup(gold).at(self.slot));
        ctx.emit(Effect::new(EffectKind::CoinRain));
        Ok(gold)
    }
}

// ============================================================================
// Acknowledge / ApplyLore
// ============================================================================

/// Clears the "newly created" flag after its creation effect played. Idempotent:
/// acknowledging an unknown or already acknowledged item is a successful no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcknowledgeAction {
    pub item: ItemId,
}

impl ActionTransition for AcknowledgeAction {
    type Error = GridError;
    /// Whether a flag was actually cleared.
    type Result = bool;

    fn apply(
        &self,
        state: &mut GameState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        match state.grid.find_by_id_mut(self.item) {
            Some(item) if item.is_new => {
                item.is_new = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Writes enrichment text onto whichever slot still holds `item`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyLoreAction {
    pub item: ItemId,
    pub lore: String,
}

impl ActionTransition for ApplyLoreAction {
    type Error = GridError;
    type Result = SlotIndex;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state
            .grid
            .position_of(self.item)
            .map(|_| ())
            .ok_or(GridError::ItemNotFound(self.item))
    }

    fn apply(
        &self,
        state: &mut GameState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let slot = state
            .grid
            .position_of(self.item)
            .ok_or(GridError::ItemNotFound(self.item))?;
        if let Some(item) = state.grid.get_mut(slot) {
            item.lore = Some(self.lore.clone());
        }
        Ok(slot)
    }
}
